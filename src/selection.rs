//! Multi-select state for bulk actions.

use crate::model::PhotoId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    /// Selected ids in the order they were picked.
    Selecting(Vec<PhotoId>),
}

impl Selection {
    pub const fn is_selecting(&self) -> bool {
        matches!(self, Self::Selecting(_))
    }

    /// Enter selection mode, or leave it and drop whatever was picked.
    pub fn toggle_mode(&mut self) {
        *self = match self {
            Self::Idle => Self::Selecting(Vec::new()),
            Self::Selecting(_) => Self::Idle,
        };
    }

    /// Flip one photo. Picking a photo while idle enters selection mode.
    pub fn toggle(&mut self, id: PhotoId) {
        match self {
            Self::Idle => *self = Self::Selecting(vec![id]),
            Self::Selecting(ids) => match ids.iter().position(|x| *x == id) {
                Some(at) => {
                    ids.remove(at);
                }
                None => ids.push(id),
            },
        }
    }

    /// If every visible photo is already picked, clear; otherwise pick exactly `visible`.
    pub fn toggle_all(&mut self, visible: &[PhotoId]) {
        let all_selected = !visible.is_empty()
            && self.len() == visible.len()
            && visible.iter().all(|id| self.is_selected(*id));
        *self = if all_selected {
            Self::Selecting(Vec::new())
        } else {
            Self::Selecting(visible.to_vec())
        };
    }

    pub fn is_selected(&self, id: PhotoId) -> bool {
        self.selected().contains(&id)
    }

    pub fn selected(&self) -> &[PhotoId] {
        match self {
            Self::Idle => &[],
            Self::Selecting(ids) => ids,
        }
    }

    pub fn len(&self) -> usize {
        self.selected().len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected().is_empty()
    }

    /// Hand the picked ids to a bulk action and return to idle.
    pub fn take(&mut self) -> Vec<PhotoId> {
        match std::mem::take(self) {
            Self::Idle => Vec::new(),
            Self::Selecting(ids) => ids,
        }
    }
}
