//! Photo acquisition: from a user selection to decoded bitmaps.
//!
//! A [`Selection`] plays the role of the system photo picker's result: an
//! ordered, bounded list of items. The picker only offers still-image media,
//! so items without a decodable extension are dropped while building the
//! selection, and anything past the limit is cut off.
//!
//! [`load_images`] then reads and decodes the items lazily, one at a time, in
//! selection order. An item that cannot be read or decoded is skipped with a
//! warning; it never aborts the rest of the batch.

use crate::imaging::{self, FilterVariant, ImageBackend};
use image::RgbaImage;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Maximum items on the multi-pick (film strip) screen.
pub const MULTI_PICK_LIMIT: usize = 4;

/// Maximum items on the single-pick (Polaroid) screen.
pub const SINGLE_PICK_LIMIT: usize = 1;

/// One picked item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    pub path: PathBuf,
}

impl PickerItem {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// An ordered, bounded set of picked items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    items: Vec<PickerItem>,
}

impl Selection {
    /// Build a selection the way the picker would hand it over.
    ///
    /// Non-image items are filtered out first; the remainder is truncated to
    /// `limit`, keeping selection order.
    pub fn pick<P: AsRef<Path>>(paths: &[P], limit: usize) -> Self {
        let mut items: Vec<PickerItem> = paths
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| {
                let ok = imaging::is_supported_image(p);
                if !ok {
                    warn!("{}: not an image, skipping", p.display());
                }
                ok
            })
            .map(|p| PickerItem {
                path: p.to_path_buf(),
            })
            .collect();

        if items.len() > limit {
            warn!(
                "{} photos selected; keeping the first {}",
                items.len(),
                limit
            );
            items.truncate(limit);
        }
        Self { items }
    }

    pub fn items(&self) -> &[PickerItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A decoded photo and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPhoto {
    pub item: PickerItem,
    pub image: RgbaImage,
}

fn load_one(backend: &impl ImageBackend, item: &PickerItem) -> Option<RgbaImage> {
    let bytes = match std::fs::read(&item.path) {
        Ok(b) => b,
        Err(e) => {
            warn!("{}: could not read ({e}), skipping", item.path.display());
            return None;
        }
    };
    match backend.decode(&bytes) {
        Ok(img) => {
            debug!(
                "{}: decoded {}x{}",
                item.path.display(),
                img.width(),
                img.height()
            );
            Some(img)
        }
        Err(e) => {
            warn!("{}: {e}, skipping", item.path.display());
            None
        }
    }
}

/// Decode the selection lazily, in order, skipping items that fail.
pub fn load_images<'a, B: ImageBackend>(
    backend: &'a B,
    selection: &'a Selection,
) -> impl Iterator<Item = LoadedPhoto> + 'a {
    selection.items().iter().filter_map(move |item| {
        load_one(backend, item).map(|image| LoadedPhoto {
            item: item.clone(),
            image,
        })
    })
}

/// Decode and filter the selection, one photo at a time.
pub fn load_and_filter<'a, B: ImageBackend>(
    backend: &'a B,
    selection: &'a Selection,
    variant: FilterVariant,
) -> impl Iterator<Item = LoadedPhoto> + 'a {
    load_images(backend, selection).map(move |photo| LoadedPhoto {
        image: imaging::apply(variant, &photo.image),
        item: photo.item,
    })
}
