/// Which tooltip panel, if any, is open. At most one at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TooltipState {
    visible: Option<usize>,
}

impl TooltipState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Click on record `id`: opens its panel, or closes it if already open.
    /// Opening a panel closes any other.
    pub fn toggle(&mut self, id: usize) {
        self.visible = match self.visible {
            Some(open) if open == id => None,
            _ => Some(id),
        };
    }

    pub fn hide(&mut self) {
        self.visible = None;
    }

    pub fn visible(&self) -> Option<usize> {
        self.visible
    }

    pub fn is_visible(&self, id: usize) -> bool {
        self.visible == Some(id)
    }
}
