// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use crate::{
    bit_sweep::BitOutputSweepProcessor,
    resolution_pipeline::{ResolutionPhase, ResolutionPipeline},
    rung_scan::RungScanProcessor,
    unresolved_report::UnresolvedReporter,
};

pub fn default_pipeline() -> ResolutionPipeline {
    // NOTE: the order of these phases is important! The sweep only looks at what the scan left
    // unresolved, and the report only at what neither of them resolved.
    let phases: Vec<Box<dyn ResolutionPhase>> = vec![
        RungScanProcessor::new(),
        BitOutputSweepProcessor::new(),
        UnresolvedReporter::new(),
    ];

    let mut res = ResolutionPipeline::default();
    for p in phases {
        res.add_phase(p);
    }
    res
}
