// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tenant resolution and staff access tokens for the Pedai platform.

pub mod resolver;
pub mod token;

pub use resolver::{subdomain_of, ResolutionInput, StoreContext, TenantResolver};
pub use token::{IssuedToken, StaffClaims, TokenService};
