//! Per-shell-process state. Carried as a struct field rather than a
//! process global, per the design notes' resolution of the source's
//! global-`errno` ambiguity.

/// State that persists across command lines within one running shell
/// process (or one remote connection's lifetime).
#[derive(Debug, Default)]
pub struct Session {
    /// The most recent external command's exit status, as reported by the
    /// `rc` built-in. Only ever written after reaping a non-built-in
    /// child; built-ins and syscall failures never touch it (Open
    /// Question (a), resolved in favor of "most recent external command").
    last_rc: i32,
}

impl Session {
    /// A fresh session with no recorded exit status.
    pub fn new() -> Session {
        Session::default()
    }

    /// The most recent external command's exit status.
    pub fn last_rc(&self) -> i32 {
        self.last_rc
    }

    /// Records `rc` as the most recent external command's exit status.
    pub fn set_last_rc(&mut self, rc: i32) {
        self.last_rc = rc;
    }
}
