//! Service layer for the auth context.

mod accounts;

pub use accounts::{
    AccountService, AccountServiceError, AccountServiceResult, AuthSession, RegisterRequest,
};
