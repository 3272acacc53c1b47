pub(crate) mod games;
pub(crate) mod players;
pub(crate) mod teams;

pub use games::GameService;
pub use players::PlayerService;
pub use teams::TeamService;
