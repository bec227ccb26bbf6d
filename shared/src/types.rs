pub type EntityId = i32;
pub type PropertyId = u16;
pub type MethodId = u16;

/// The server-side execution context a remote call is addressed to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallContext {
    /// Persistent, global entity logic
    Base,
    /// Spatial simulation logic
    Cell,
}

impl CallContext {
    pub fn name(self) -> &'static str {
        match self {
            CallContext::Base => "base",
            CallContext::Cell => "cell",
        }
    }
}

impl std::fmt::Display for CallContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
