use tonic::Status;
use tonic::metadata::MetadataMap;

use crate::application::post_service::Actor;
use crate::infrastructure::jwt::JwtService;

/// Resolves the caller from `authorization` metadata. Absent metadata means anonymous.
pub(crate) fn resolve_actor(
    jwt: &JwtService,
    metadata: &MetadataMap,
) -> Result<Option<Actor>, Status> {
    let Some(token) = parse_bearer_token(metadata)? else {
        return Ok(None);
    };

    let claims = jwt
        .verify_token(token)
        .map_err(|_| Status::unauthenticated("invalid token"))?;

    Ok(Some(Actor {
        user_id: claims.sub,
    }))
}

fn parse_bearer_token(metadata: &MetadataMap) -> Result<Option<&str>, Status> {
    let Some(raw) = metadata.get("authorization") else {
        return Ok(None);
    };

    let invalid = || Status::unauthenticated("invalid authorization metadata");
    let raw = raw.to_str().map_err(|_| invalid())?;

    let mut parts = raw.split_whitespace();
    let scheme = parts.next().ok_or_else(invalid)?;
    let token = parts.next().ok_or_else(invalid)?;

    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return Err(invalid());
    }

    Ok(Some(token))
}
