//! Per-frame orchestration: binarize, locate, sample, decode, stabilise.
//!
//! Each `process_frame` call runs to completion before the next one; nothing
//! here spawns threads or blocks. The first candidate that decodes wins the
//! frame. A decode is reported only once it is stable over the configured
//! window, and the callback fires once per newly stable string.

mod stability;

pub use stability::StabilityState;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::ScanConfig;
use crate::decoder::SymbolDecoder;
use crate::detector::FinderLocator;
use crate::error::Result;
use crate::models::{DecodeResult, Decoded, FrameBuffer};
use crate::sampler::PerspectiveSampler;
use crate::utils::binarization::Binarizer;

/// Where the pipeline is in its frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// No frame submitted yet
    Idle,
    /// Waiting for or locating in a frame
    Scanning,
    /// Sampling the k-th candidate of the current frame
    Candidate(usize),
    /// Decoding a sampled grid
    Validating,
    /// A stable decode was just reported
    Emitting,
    /// Frames are refused until `restart`
    Stopped,
}

/// Clonable stop request usable from another thread.
///
/// The request is honoured when the next frame is submitted; a frame already
/// in progress finishes normally.
#[derive(Debug, Clone)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Callback receiving each newly stable decode
pub type DecodeCallback = Box<dyn FnMut(&Decoded) + Send>;

/// Frame-in, result-out scanning pipeline with a stability policy
pub struct DecodePipeline {
    config: ScanConfig,
    binarizer: Binarizer,
    locator: FinderLocator,
    stability: StabilityState,
    state: PipelineState,
    stop_flag: Arc<AtomicBool>,
    on_decode: Option<DecodeCallback>,
    last_candidate_count: usize,
}

impl DecodePipeline {
    /// Build a pipeline; fails with `Configuration` for invalid parameters
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            binarizer: Binarizer::new(config.binarization_bias, config.window_divisor),
            locator: FinderLocator::new(&config),
            stability: StabilityState::new(config.stability_window),
            state: PipelineState::Idle,
            stop_flag: Arc::new(AtomicBool::new(false)),
            on_decode: None,
            last_candidate_count: 0,
            config,
        })
    }

    /// Register the decode callback, replacing any previous one
    pub fn with_callback(mut self, callback: impl FnMut(&Decoded) + Send + 'static) -> Self {
        self.set_callback(callback);
        self
    }

    pub fn set_callback(&mut self, callback: impl FnMut(&Decoded) + Send + 'static) {
        self.on_decode = Some(Box::new(callback));
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Candidates located in the most recent frame
    pub fn last_candidate_count(&self) -> usize {
        self.last_candidate_count
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            flag: Arc::clone(&self.stop_flag),
        }
    }

    /// Enter `Stopped` and forget all stability history
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        self.enter_stopped();
    }

    /// Leave `Stopped` (or any state) for `Idle` with fresh stability history
    pub fn restart(&mut self) {
        self.stop_flag.store(false, Ordering::SeqCst);
        self.stability.reset();
        self.state = PipelineState::Idle;
        self.last_candidate_count = 0;
        log::debug!("pipeline restarted");
    }

    fn enter_stopped(&mut self) {
        if self.state != PipelineState::Stopped {
            log::warn!("pipeline stopped");
        }
        self.stability.reset();
        self.state = PipelineState::Stopped;
    }

    /// Run one frame through the pipeline.
    ///
    /// Never fails: frames without a stable decode, and every frame while
    /// stopped, return `NotFound`.
    pub fn process_frame(&mut self, frame: &FrameBuffer) -> DecodeResult {
        if self.stop_flag.load(Ordering::SeqCst) {
            self.enter_stopped();
        }
        if self.state == PipelineState::Stopped {
            log::trace!("frame refused while stopped");
            return DecodeResult::NotFound;
        }

        self.state = PipelineState::Scanning;
        let top = self.scan(frame);
        let stable = self.stability.record(top.as_ref().map(|d| d.text.as_str()));

        let decoded = match top {
            Some(decoded) if stable => decoded,
            Some(decoded) => {
                log::debug!(
                    "'{}' not yet stable over {} frames",
                    decoded.text,
                    self.stability.window()
                );
                self.state = PipelineState::Scanning;
                return DecodeResult::NotFound;
            }
            None => {
                self.state = PipelineState::Scanning;
                return DecodeResult::NotFound;
            }
        };

        self.state = PipelineState::Emitting;
        if self.stability.should_emit(&decoded.text) {
            log::info!(
                "decoded {} '{}' ({} errors corrected)",
                decoded.symbology,
                decoded.text,
                decoded.errors_corrected
            );
            if let Some(callback) = self.on_decode.as_mut() {
                callback(&decoded);
            }
            if self.config.stop_after_emit {
                self.stop();
            }
        }
        DecodeResult::Decoded(decoded)
    }

    /// Binarize, locate and try candidates in order until one decodes
    fn scan(&mut self, frame: &FrameBuffer) -> Option<Decoded> {
        let mask = self.binarizer.binarize(frame);
        let candidates = self.locator.locate(&mask);
        self.last_candidate_count = candidates.len();
        log::debug!(
            "{}x{} frame: {} candidates",
            frame.width(),
            frame.height(),
            self.last_candidate_count
        );

        for (k, region) in candidates.enumerate() {
            self.state = PipelineState::Candidate(k);
            let grid = match PerspectiveSampler::sample(&mask, &region) {
                Ok(grid) => grid,
                Err(err) => {
                    log::trace!("candidate {k} ({}) skipped: {err}", region.symbology());
                    continue;
                }
            };
            self.state = PipelineState::Validating;
            if let DecodeResult::Decoded(decoded) = SymbolDecoder::decode(&grid) {
                return Some(decoded);
            }
            log::trace!("candidate {k} ({}) did not decode", region.symbology());
        }
        None
    }
}
