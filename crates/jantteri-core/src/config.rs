// ── Runtime session target ──
//
// Describes *where* a session should connect. Built by the presentation
// layer (or resolved from a jantteri-config profile) and handed to
// `Session::set_target` -- core never reads config files.

/// Where a session points: a server URL plus an optional game room.
///
/// An empty `server_url` is the valid idle state -- the session holds no
/// connection and reports `Disconnected`. A `game_id` of `None` means no
/// room join/leave is performed on that connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTarget {
    /// Controller URL, e.g. `ws://localhost:5000`. Empty means idle.
    pub server_url: String,

    /// Game room to join once connected, e.g. `VVUKUI`.
    pub game_id: Option<String>,
}

impl SessionTarget {
    /// Target a server without joining a room.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            game_id: None,
        }
    }

    /// Attach a game room to join on connect.
    pub fn with_game(mut self, game_id: impl Into<String>) -> Self {
        self.game_id = Some(game_id.into());
        self
    }

    /// The idle target: no server, no connection.
    pub fn idle() -> Self {
        Self::default()
    }

    /// `true` when no connection should be held.
    pub fn is_idle(&self) -> bool {
        self.server_url.trim().is_empty()
    }
}
