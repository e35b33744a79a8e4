//! Contour extraction, geometric gating and candidate ranking.

use std::f64::consts::PI;

use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::geometry::arc_length;
use imageproc::point::Point;
use nalgebra::Point2;
use ndarray::{Axis, s};
use tracing::trace;

use crate::config::{CandidateParams, ColorTarget, ScoringWeights};

use super::segment::HsvImage;

/// One contour that survived the area and circularity gates.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateBlob {
    /// Centroid in working-frame coordinates.
    pub centroid: Point2<f64>,
    pub area: f64,
    pub perimeter: f64,
    pub circularity: f64,
    /// Colour purity (0 when the channel is not scored for colour).
    pub purity: f64,
    pub score: f64,
}

/// Per-search context for [`select_candidate`].
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    /// When present, candidates are scored for colour purity.
    pub hsv: Option<&'a HsvImage>,
    /// Accept elongated motion streaks.
    pub allow_streak: bool,
    /// Predicted ball position in working-frame coordinates.
    pub predicted: Option<Point2<f64>>,
}

/// Zeroth and first order area moments of a closed polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    /// Green's theorem over the polygon outline. Orientation only flips the
    /// sign of every term, so the centroid is orientation independent.
    pub fn of_polygon(points: &[Point<i32>]) -> Self {
        let n = points.len();
        let (mut a00, mut a10, mut a01) = (0.0, 0.0, 0.0);
        for i in 0..n {
            let p = points[i];
            let q = points[(i + 1) % n];
            let (xi, yi) = (p.x as f64, p.y as f64);
            let (xj, yj) = (q.x as f64, q.y as f64);
            let cross = xi * yj - xj * yi;
            a00 += cross;
            a10 += (xi + xj) * cross;
            a01 += (yi + yj) * cross;
        }
        Self {
            m00: a00 / 2.0,
            m10: a10 / 6.0,
            m01: a01 / 6.0,
        }
    }

    pub fn area(&self) -> f64 {
        self.m00.abs()
    }

    pub fn centroid(&self) -> Option<Point2<f64>> {
        if self.m00 == 0.0 {
            return None;
        }
        Some(Point2::new(self.m10 / self.m00, self.m01 / self.m00))
    }
}

/// `4π·area/perimeter²`; 1 for an ideal disk.
#[inline]
pub fn circularity(area: f64, perimeter: f64) -> f64 {
    4.0 * PI * area / (perimeter * perimeter)
}

/// Closeness of the mean colour around `center` to the ideal target.
///
/// Hue distance wraps around the 0/180 boundary and costs twice per unit;
/// saturation and value only cost when they fall short of the ideal.
/// Returns `None` when the sampling window is empty.
pub fn color_purity(
    hsv: &HsvImage,
    center: Point2<f64>,
    half_size: usize,
    target: &ColorTarget,
) -> Option<f64> {
    let (w, h) = (hsv.width(), hsv.height());
    let cx = center.x.round().clamp(0.0, (w - 1) as f64) as usize;
    let cy = center.y.round().clamp(0.0, (h - 1) as f64) as usize;

    let x0 = cx.saturating_sub(half_size);
    let x1 = (cx + half_size + 1).min(w);
    let y0 = cy.saturating_sub(half_size);
    let y1 = (cy + half_size + 1).min(h);

    let roi = hsv.data().slice(s![y0..y1, x0..x1, ..]).mapv(f64::from);
    let mean = roi.mean_axis(Axis(0))?.mean_axis(Axis(0))?;
    let (mean_h, mean_s, mean_v) = (mean[0], mean[1], mean[2]);

    let raw_dh = (mean_h - target.hue).abs();
    let dh = raw_dh.min(180.0 - raw_dh);
    let ds = (target.saturation - mean_s).max(0.0);
    let dv = (target.value - mean_v).max(0.0);

    Some(100.0 - (dh * 2.0 + ds * 0.1 + dv * 0.05))
}

/// Extract, gate and rank the blobs of `mask`, returning the best one.
///
/// Ties keep the first candidate in contour scan order.
pub fn select_candidate(
    mask: &GrayImage,
    params: &CandidateParams,
    weights: &ScoringWeights,
    target: &ColorTarget,
    ctx: SearchContext<'_>,
) -> Option<CandidateBlob> {
    gather_candidates(mask, params, weights, target, ctx)
        .into_iter()
        .fold(None, |best, blob| {
            if best.as_ref().is_none_or(|b: &CandidateBlob| blob.score > b.score) {
                Some(blob)
            } else {
                best
            }
        })
}

/// Every scored blob of `mask` that passes the area and circularity gates,
/// in contour scan order.
///
/// Only top-level outer borders are considered: a region sitting inside the
/// hole of another region is part of that region's interior, not a blob of
/// its own.
pub(crate) fn gather_candidates(
    mask: &GrayImage,
    params: &CandidateParams,
    weights: &ScoringWeights,
    target: &ColorTarget,
    ctx: SearchContext<'_>,
) -> Vec<CandidateBlob> {
    let (w, h) = mask.dimensions();
    let short_side = w.min(h) as f64;
    let max_area = short_side * short_side * params.max_area_fraction;
    let min_circularity = if ctx.hsv.is_some() && ctx.allow_streak {
        params.streak_min_circularity
    } else {
        params.min_circularity
    };
    let max_pred_dist = short_side * weights.prediction_radius_fraction;

    let mut candidates = Vec::new();

    for contour in find_contours::<i32>(mask) {
        if contour.border_type != BorderType::Outer || contour.parent.is_some() {
            continue;
        }

        let moments = Moments::of_polygon(&contour.points);
        let area = moments.area();
        if area < params.min_area || area > max_area {
            continue;
        }
        let perimeter = arc_length(&contour.points, true);
        if perimeter <= 0.0 {
            continue;
        }
        let circ = circularity(area, perimeter);
        if circ < min_circularity {
            continue;
        }
        let Some(centroid) = moments.centroid() else {
            continue;
        };

        let mut purity = 0.0;
        let mut score = area;
        if let Some(hsv) = ctx.hsv {
            let half_size = ((area.sqrt() * params.purity_radius_factor) as usize).max(2);
            if let Some(p) = color_purity(hsv, centroid, half_size, target) {
                purity = p;
                if p > 0.0 {
                    score = p * weights.purity_weight + area;
                }
            }
        }

        if let Some(predicted) = ctx.predicted {
            let dist = (centroid - predicted).norm();
            if dist < max_pred_dist {
                score += weights.prediction_bonus * (1.0 - dist / max_pred_dist);
            }
        }

        trace!(
            x = centroid.x,
            y = centroid.y,
            area,
            circularity = circ,
            purity,
            score,
            "candidate"
        );

        candidates.push(CandidateBlob {
            centroid,
            area,
            perimeter,
            circularity: circ,
            purity,
            score,
        });
    }

    candidates
}
