// Library root
// -----------
// The binary (`main.rs`) only wires an `ApiClient` into an `App` and runs
// the top menu; everything else lives here so it can be tested.
//
// Module responsibilities:
// - `domain`: validated value objects, immutable entities, the aggregate
//   store and the session token.
// - `mirror`: local-index-to-remote-id bookkeeping kept in lockstep with
//   the store.
// - `menu`: the generic key-driven menu loop.
// - `api`: blocking HTTP client returning status + parsed JSON.
// - `managers`: per-resource operations (remote call first, mirror after).
// - `app`: menu wiring and privilege gating.
// - `ui`: dialoguer-based prompts and table helpers.

pub mod api;
pub mod app;
pub mod domain;
pub mod error;
pub mod managers;
pub mod menu;
pub mod mirror;
pub mod ui;
