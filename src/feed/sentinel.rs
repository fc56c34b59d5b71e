/// Visibility registration for the last rendered product.
///
/// Only one product is observed at a time. Observing a different product
/// replaces the previous registration, so a stale sentinel can never trigger
/// a fetch. A registration fires when its product goes from hidden to
/// visible; staying visible across redraws does not fire again.
#[derive(Debug, Default, Clone)]
pub struct Sentinel {
    target: Option<String>,
    visible: bool,
}

impl Sentinel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Registers `target` as the sentinel. Returns `true` if the
    /// registration changed.
    pub fn observe(&mut self, target: Option<&str>) -> bool {
        if self.target.as_deref() == target {
            return false;
        }
        self.target = target.map(str::to_owned);
        self.visible = false;
        true
    }

    pub fn disconnect(&mut self) {
        self.target = None;
        self.visible = false;
    }

    /// Forgets the last visibility report so the next visible report fires.
    pub fn rearm(&mut self) {
        self.visible = false;
    }

    /// Reports the visibility of `id`. Returns `true` when this report is the
    /// hidden-to-visible transition of the observed sentinel.
    pub fn report(&mut self, id: &str, visible: bool) -> bool {
        if self.target.as_deref() != Some(id) {
            return false;
        }
        let entered = visible && !self.visible;
        self.visible = visible;
        entered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_while_visible() {
        let mut sentinel = Sentinel::new();
        sentinel.observe(Some("p11"));

        assert!(sentinel.report("p11", true));
        assert!(!sentinel.report("p11", true));
        assert!(!sentinel.report("p11", true));
    }

    #[test]
    fn test_fires_again_after_scrolling_away_and_back() {
        let mut sentinel = Sentinel::new();
        sentinel.observe(Some("p11"));

        assert!(sentinel.report("p11", true));
        assert!(!sentinel.report("p11", false));
        assert!(sentinel.report("p11", true));
    }

    #[test]
    fn test_ignores_previous_sentinel() {
        let mut sentinel = Sentinel::new();
        sentinel.observe(Some("p11"));
        assert!(sentinel.observe(Some("p23")));

        assert!(!sentinel.report("p11", true));
        assert!(sentinel.report("p23", true));
    }

    #[test]
    fn test_reobserving_same_target_keeps_arming() {
        let mut sentinel = Sentinel::new();
        sentinel.observe(Some("p11"));
        assert!(sentinel.report("p11", true));

        assert!(!sentinel.observe(Some("p11")));
        assert!(!sentinel.report("p11", true));
    }

    #[test]
    fn test_rearm() {
        let mut sentinel = Sentinel::new();
        sentinel.observe(Some("p11"));
        assert!(sentinel.report("p11", true));

        sentinel.rearm();
        assert!(sentinel.report("p11", true));
    }

    #[test]
    fn test_disconnect() {
        let mut sentinel = Sentinel::new();
        sentinel.observe(Some("p11"));
        sentinel.disconnect();

        assert_eq!(sentinel.target(), None);
        assert!(!sentinel.report("p11", true));
    }
}
