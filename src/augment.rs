//! Randomized longitude-shift augmentation
//!
//! A circular shift along the longitude axis models the periodic boundary of
//! the spherical grid: values rolled past the last longitude reappear at the
//! first. One shift value is drawn per sample access and applied identically
//! to the feature field and the label grid, keeping the two pixel-aligned.
//!
//! The draw is two-step: a coin flip gates the shift, then a magnitude is
//! drawn from `[0, 359]`. Half of all accesses therefore see no shift at
//! all; do not collapse this into a single uniform draw.

use ndarray::{Array3, Array4, ArrayViewMutD, Axis};
use rand::thread_rng;
use rand::Rng;

/// Draw one longitude shift: `gamma ∈ {0, 1}` times `magnitude ∈ [0, 359]`.
///
/// Uses the thread-local generator, so concurrent sample loads on worker
/// threads draw independently.
pub fn draw_longitude_shift() -> usize {
    let mut rng = thread_rng();
    let gamma = rng.gen_range(0..=1usize);
    let magnitude = rng.gen_range(0..=359usize);
    gamma * magnitude
}

/// Circularly shift a `(time, variable, lat, lon)` feature field along
/// longitude by `shift` positions, in place.
pub fn shift_features(features: &mut Array4<f32>, shift: usize) {
    roll_last_axis(features.view_mut().into_dyn(), shift);
}

/// Circularly shift a `(time, lat, lon)` label grid along longitude by
/// `shift` positions, in place.
pub fn shift_labels(labels: &mut Array3<i32>, shift: usize) {
    roll_last_axis(labels.view_mut().into_dyn(), shift);
}

/// Roll every lane of the last (longitude) axis by `shift`, wrapping.
fn roll_last_axis<T: Copy>(mut array: ArrayViewMutD<'_, T>, shift: usize) {
    let lon_axis = Axis(array.ndim() - 1);
    let width = array.len_of(lon_axis);
    if width == 0 {
        return;
    }
    let shift = shift % width;
    if shift == 0 {
        return;
    }

    for mut lane in array.lanes_mut(lon_axis) {
        if let Some(slice) = lane.as_slice_mut() {
            slice.rotate_right(shift);
        } else {
            let rolled: Vec<T> = (0..width)
                .map(|k| lane[(k + width - shift) % width])
                .collect();
            for (dst, value) in lane.iter_mut().zip(rolled) {
                *dst = value;
            }
        }
    }
}
