use tonic::Status;

use crate::domain::error::DomainError;

pub(crate) const RATE_LIMITED_MESSAGE: &str = "you are posting too fast, try again later";

pub(crate) fn map_domain_error(err: DomainError) -> Status {
    match err {
        DomainError::Validation { field, message } => {
            Status::invalid_argument(format!("{field} {message}"))
        }
        DomainError::Unauthenticated => Status::unauthenticated(err.to_string()),
        DomainError::NotFound(_) => Status::not_found(err.to_string()),
        DomainError::RateLimited => Status::resource_exhausted(RATE_LIMITED_MESSAGE),
        DomainError::IntegrityFault(_) | DomainError::Unexpected(_) => {
            tracing::error!(error = %err, "grpc call failed");
            Status::internal("internal error")
        }
    }
}
