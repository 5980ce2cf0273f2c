//! User directory errors.

use thiserror::Error;

use crate::{
    domain::users::models::UserUuid,
    errors::{Classify, ErrorKind},
};

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("profile for user {0} not found")]
    ProfileNotFound(UserUuid),
}

impl Classify for UsersServiceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::ProfileNotFound(_) => ErrorKind::NotFound,
        }
    }
}
