//! Bus abstractions and engine logic for the Glint driver cores
//!
//! This crate contains everything that does not depend on a specific
//! chip or board:
//!
//! - Bus transport and line-control traits
//! - Orientation resolution (logical rotation -> control register byte)
//! - The multi-stage register sequencer used for panel bring-up
//! - The chip identification probe for touch controllers
//! - Variant descriptor types consumed by the driver cores
//!
//! Per-chip descriptors and the display/touch driver cores live in
//! `glint-drivers`.

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod identify;
pub mod orientation;
pub mod sequencer;
pub mod variant;

// Re-export key types at crate root for convenience
pub use bus::{BusError, BusTransport, LineControl, LineLevel};
pub use identify::{identify, ChipIdentity, IdentifyError};
pub use orientation::{resolve, InvalidRotation, MadctlTable, Rotation};
pub use sequencer::{run_stages, InitStage, SeqOp, SequenceError, StageKind, StageState};
pub use variant::{ByteOrder, CoordLayout, DisplayVariant, RegWidth, TouchRegisterMap, TouchVariant};
