// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod firebase;
mod google;
mod policy;
mod signin;

pub use firebase::{FirebaseConfig, FirebaseConfigLayer};
pub use google::{GoogleConfig, GoogleConfigLayer};
pub use policy::{PolicyConfig, PolicyConfigLayer, DEFAULT_UNAUTHORIZED_CODE};
pub use signin::{SignInConfig, SignInConfigLayer};
