// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Options steering the resolution phases. Usually read from the `[resolution]` table of the
/// tool's configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolutionOptions {
    /// Report every rung that drives a swept bit, not only the first one in scan order.
    pub attribute_every_coil: bool,
}
