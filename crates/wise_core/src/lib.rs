//! Wise Core Runtime
//!
//! Foundational primitives shared by the Wise app crates:
//!
//! - **State Machines**: flat statecharts with entry/exit actions,
//!   used to drive screen-to-screen flow
//!
//! # Example
//!
//! ```rust
//! use wise_core::fsm::StateMachine;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Screen { Launch, Onboarding }
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Nav { LaunchFinished }
//!
//! let mut flow = StateMachine::builder(Screen::Launch)
//!     .on(Screen::Launch, Nav::LaunchFinished, Screen::Onboarding)
//!     .build();
//!
//! assert_eq!(flow.send(Nav::LaunchFinished), Screen::Onboarding);
//! ```

pub mod fsm;

pub use fsm::{FsmKey, StateMachine, StateMachineBuilder};
