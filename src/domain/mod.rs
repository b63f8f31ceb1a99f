//! Domain Layer
//!
//! The core of rollout: deployment rules without I/O.
//!
//! ## Structure
//!
//! - `entities/` - Descriptor, build artifact, transfer plan, command pipeline
//! - `value_objects/` - Immutable value types (Fingerprint, Secret, DeployStage)
//! - `services/` - Pure rules (pipeline composer, dependency diff, transfer selection)
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never spawns processes or opens connections
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
