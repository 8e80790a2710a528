fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=../proto/chirp.proto");
    tonic_prost_build::configure()
        .build_server(false)
        .compile_protos(&["../proto/chirp.proto"], &["../proto"])?;
    Ok(())
}
