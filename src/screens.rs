//! Screen state and the event handlers that drive it.
//!
//! There are two destinations: a single-photo Polaroid screen and a multi-photo
//! film-strip screen. Each is a plain struct. Handlers take the backend or
//! library they need as an argument, run the work to completion, and update the
//! struct in place.
//!
//! ```text
//! pick  ──▶ Selection ──▶ decode ──▶ filter ──▶ screen state
//! save  ──▶ authorization ──▶ write ──▶ status message
//! ```

use crate::acquire::{self, MULTI_PICK_LIMIT, PickerItem, SINGLE_PICK_LIMIT, Selection};
use crate::imaging::{FilterVariant, ImageBackend, PolaroidPreset};
use crate::library::{self, PhotoLibrary, SaveOutcome};
use image::RgbaImage;
use log::debug;
use std::path::Path;

/// Single-photo screen with the Polaroid look.
#[derive(Debug, Clone, Default)]
pub struct PolaroidScreen {
    pub preset: PolaroidPreset,
    /// The filtered photo, once one has been picked.
    pub selected_photo: Option<RgbaImage>,
    pub save_message: String,
    pub showing_save_alert: bool,
}

impl PolaroidScreen {
    pub fn new(preset: PolaroidPreset) -> Self {
        Self {
            preset,
            ..Self::default()
        }
    }

    /// Pick a photo and show it filtered.
    ///
    /// Only the first supported item counts. If it cannot be decoded the
    /// previously shown photo stays. Returns the item now shown, if it changed.
    pub fn on_pick<P: AsRef<Path>>(
        &mut self,
        backend: &impl ImageBackend,
        paths: &[P],
    ) -> Option<PickerItem> {
        let selection = Selection::pick(paths, SINGLE_PICK_LIMIT);
        let variant = FilterVariant::Polaroid(self.preset);
        let photo = acquire::load_and_filter(backend, &selection, variant).next()?;
        debug!("polaroid: showing {}", photo.item.file_name());
        self.selected_photo = Some(photo.image);
        Some(photo.item)
    }

    /// Save the shown photo and raise the status alert.
    ///
    /// Without a photo there is nothing to save and the state is untouched.
    pub fn on_save(&mut self, library: &impl PhotoLibrary) -> Option<SaveOutcome> {
        let photo = self.selected_photo.as_ref()?;
        let outcome = library::save_photo(library, photo);
        self.save_message = outcome.message();
        self.showing_save_alert = true;
        Some(outcome)
    }

    pub fn dismiss_alert(&mut self) {
        self.showing_save_alert = false;
    }
}

/// Multi-photo screen with the film-strip look.
#[derive(Debug, Clone)]
pub struct PhotoStripScreen {
    /// Filtered photos in the order they were added.
    pub photos: Vec<RgbaImage>,
    pick_limit: usize,
}

impl Default for PhotoStripScreen {
    fn default() -> Self {
        Self::new(MULTI_PICK_LIMIT)
    }
}

impl PhotoStripScreen {
    /// `pick_limit` is clamped to `1..=MULTI_PICK_LIMIT`.
    pub fn new(pick_limit: usize) -> Self {
        Self {
            photos: Vec::new(),
            pick_limit: pick_limit.clamp(1, MULTI_PICK_LIMIT),
        }
    }

    pub fn pick_limit(&self) -> usize {
        self.pick_limit
    }

    /// Pick up to `pick_limit` photos and append each one as it finishes.
    ///
    /// Photos from earlier picks are kept. Items that fail to decode are
    /// skipped. Returns the appended items, in order.
    pub fn on_pick<P: AsRef<Path>>(
        &mut self,
        backend: &impl ImageBackend,
        paths: &[P],
    ) -> Vec<PickerItem> {
        let selection = Selection::pick(paths, self.pick_limit);
        let mut appended = Vec::new();
        for photo in acquire::load_and_filter(backend, &selection, FilterVariant::FilmStrip) {
            debug!("strip: appended {}", photo.item.file_name());
            self.photos.push(photo.image);
            appended.push(photo.item);
        }
        appended
    }

    /// Save every photo in the strip, in order.
    ///
    /// Authorization is requested per photo, so a denial is reported for each.
    pub fn on_save_all(&self, library: &impl PhotoLibrary) -> Vec<SaveOutcome> {
        self.photos
            .iter()
            .map(|photo| library::save_photo(library, photo))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::RustBackend;
    use crate::library::tests::MockLibrary;
    use crate::library::{AuthorizationStatus, MSG_ACCESS_DENIED, MSG_SAVED};
    use crate::test_helpers::{write_corrupt_image, write_test_jpeg};
    use tempfile::TempDir;

    // =========================================================================
    // PolaroidScreen
    // =========================================================================

    #[test]
    fn polaroid_pick_shows_square_photo() {
        let tmp = TempDir::new().unwrap();
        let photo = write_test_jpeg(tmp.path(), "beach.jpg", 60, 40);

        let mut screen = PolaroidScreen::default();
        let shown = screen.on_pick(&RustBackend::new(), &[photo]).unwrap();
        assert_eq!(shown.file_name(), "beach.jpg");
        assert_eq!(screen.selected_photo.as_ref().unwrap().dimensions(), (40, 40));
    }

    #[test]
    fn polaroid_failed_pick_keeps_previous_photo() {
        let tmp = TempDir::new().unwrap();
        let good = write_test_jpeg(tmp.path(), "good.jpg", 30, 30);
        let bad = write_corrupt_image(tmp.path(), "bad.jpg");
        let backend = RustBackend::new();

        let mut screen = PolaroidScreen::default();
        screen.on_pick(&backend, &[good]);
        assert!(screen.on_pick(&backend, &[bad]).is_none());
        assert_eq!(screen.selected_photo.as_ref().unwrap().dimensions(), (30, 30));
    }

    #[test]
    fn polaroid_save_without_photo_does_nothing() {
        let lib = MockLibrary::with_status(AuthorizationStatus::Authorized);
        let mut screen = PolaroidScreen::default();
        assert!(screen.on_save(&lib).is_none());
        assert!(!screen.showing_save_alert);
        assert_eq!(lib.writes.get(), 0);
    }

    #[test]
    fn polaroid_save_sets_message_and_alert() {
        let lib = MockLibrary::with_status(AuthorizationStatus::Authorized);
        let mut screen = PolaroidScreen {
            selected_photo: Some(RgbaImage::new(8, 8)),
            ..PolaroidScreen::default()
        };
        screen.on_save(&lib);
        assert_eq!(screen.save_message, MSG_SAVED);
        assert!(screen.showing_save_alert);

        screen.dismiss_alert();
        assert!(!screen.showing_save_alert);
    }

    #[test]
    fn polaroid_denied_save_reports_denial() {
        let lib = MockLibrary::with_status(AuthorizationStatus::Denied);
        let mut screen = PolaroidScreen {
            selected_photo: Some(RgbaImage::new(8, 8)),
            ..PolaroidScreen::default()
        };
        screen.on_save(&lib);
        assert_eq!(screen.save_message, MSG_ACCESS_DENIED);
        assert_eq!(lib.writes.get(), 0);
    }

    // =========================================================================
    // PhotoStripScreen
    // =========================================================================

    #[test]
    fn strip_keeps_first_four_of_five() {
        let tmp = TempDir::new().unwrap();
        let paths: Vec<_> = (0..5)
            .map(|i| write_test_jpeg(tmp.path(), &format!("{i}.jpg"), 20 + i, 16))
            .collect();

        let mut screen = PhotoStripScreen::default();
        assert_eq!(screen.on_pick(&RustBackend::new(), &paths).len(), 4);
        assert_eq!(screen.photos.len(), 4);
        assert!(screen.photos.iter().all(|p| p.dimensions() == (16, 16)));
    }

    #[test]
    fn strip_picks_append() {
        let tmp = TempDir::new().unwrap();
        let a = write_test_jpeg(tmp.path(), "a.jpg", 12, 10);
        let b = write_test_jpeg(tmp.path(), "b.jpg", 9, 14);
        let backend = RustBackend::new();

        let mut screen = PhotoStripScreen::default();
        screen.on_pick(&backend, &[a]);
        screen.on_pick(&backend, &[b]);
        let sides: Vec<u32> = screen.photos.iter().map(|p| p.width()).collect();
        assert_eq!(sides, [10, 9]);
    }

    #[test]
    fn strip_limit_is_clamped() {
        assert_eq!(PhotoStripScreen::new(0).pick_limit(), 1);
        assert_eq!(PhotoStripScreen::new(10).pick_limit(), 4);
        assert_eq!(PhotoStripScreen::new(2).pick_limit(), 2);
    }

    #[test]
    fn strip_save_all_reports_each_photo() {
        let lib = MockLibrary::with_status(AuthorizationStatus::Authorized);
        let screen = PhotoStripScreen {
            photos: vec![RgbaImage::new(4, 4), RgbaImage::new(6, 6)],
            pick_limit: 4,
        };
        let outcomes = screen.on_save_all(&lib);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(SaveOutcome::is_saved));
        assert_eq!(*lib.saved.borrow(), vec![(4, 4), (6, 6)]);
    }
}
