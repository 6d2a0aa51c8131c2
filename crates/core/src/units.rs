//! Length unit conversions.
//!
//! All geometry in the engine is expressed in points. Dialog input is often
//! captured in centimetres, so settings objects convert at the boundary.

/// Points per centimetre (72 / 2.54).
pub const CM_TO_PT: f64 = 72.0 / 2.54;

/// Points per inch.
pub const INCH_TO_PT: f64 = 72.0;

#[inline]
pub fn cm_to_pt(cm: f64) -> f64 {
    cm * CM_TO_PT
}

#[inline]
pub fn pt_to_cm(pt: f64) -> f64 {
    pt / CM_TO_PT
}
