fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=../proto/chirp.proto");
    tonic_prost_build::compile_protos("../proto/chirp.proto")?;
    Ok(())
}
