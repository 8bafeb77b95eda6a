// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Signed-embedding token issuance.
//!
//! Tokens are stateless: nothing is stored, and every token expires
//! [`TOKEN_TTL_SECS`] after it was signed.

pub mod claims;
pub mod issuer;
pub mod viewer;

pub use claims::{EmbedClaims, EmbedResource, ResourceKind, TOKEN_TTL_SECS};
pub use issuer::{EmbedRequest, IssuedToken, TokenError, TokenIssuer};
pub use viewer::{DisplayOptions, EmbedUrlBuilder, EmbedUrlError};
