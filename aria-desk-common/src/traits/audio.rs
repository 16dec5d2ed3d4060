pub trait AudioPlayer {
    type Error: core::fmt::Debug;

    /// Load `path` and start playing it.
    fn play(&mut self, path: &str) -> Result<(), Self::Error>;

    fn set_active(&mut self, active: bool);

    fn is_active(&self) -> bool;

    fn track(&self) -> Option<&str>;
}
