// One module per resource kind, plus auth and the initial mirror load.
// Every manager keeps the same discipline: the remote call happens first,
// and the local mirror is only touched once the server confirmed.

pub mod auth;
pub mod goals;
pub mod group_goals;
pub mod groups;
pub mod loader;
pub mod topics;
