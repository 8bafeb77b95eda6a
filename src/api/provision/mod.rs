// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /provision/card endpoint

pub mod handler;
pub mod request;
pub mod response;

pub use handler::provision_card_handler;
pub use request::ProvisionCardRequest;
pub use response::ProvisionCardResponse;
