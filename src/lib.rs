//! voice-recorder - microphone recording with a pause/resume session contract
//!
//! Records audio from the default input device, encodes it to FLAC or WAV and
//! either writes it below a platform directory or hands it back as base64.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Recording status, session state machine, options, errors
//! - **Application**: The [`application::VoiceRecorderPlugin`] contract, the
//!   recorder use case and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, flacenc, hound, filesystem, XDG config)
//! - **CLI**: Command-line interface, JSON-lines bridge and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
