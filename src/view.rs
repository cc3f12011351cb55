/// The two screens of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Entry,
    Dashboard,
}

impl View {
    pub fn title(self) -> &'static str {
        match self {
            View::Entry => "Quick Add",
            View::Dashboard => "Dashboard",
        }
    }
}

#[derive(Debug, Default)]
pub struct ViewController {
    current: View,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> View {
        self.current
    }

    pub fn select(&mut self, view: View) {
        self.current = view;
    }

    pub fn toggle(&mut self) {
        self.current = match self.current {
            View::Entry => View::Dashboard,
            View::Dashboard => View::Entry,
        };
    }

    /// A successful submit always lands on the dashboard.
    pub fn on_submitted(&mut self) {
        self.current = View::Dashboard;
    }
}
