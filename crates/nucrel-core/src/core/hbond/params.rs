//! Constant tables of the hydrogen-bond mixture model.
//!
//! The model is a seven-component trivariate Gaussian mixture over the
//! descriptor `(ln d(H,LP)^3, atanh cos ∠DHA, atanh cos ∠ADL)`. Component 0
//! describes true hydrogen bonds; the remaining components describe the
//! background of non-bonded donor/acceptor geometries.
//!
//! These values are a reconstructed parameter set, not the validated fit of
//! the statistical model. They separate canonical base-pair geometries from
//! distorted ones but should not be relied on as calibrated probabilities.

pub const COMPONENTS: usize = 7;

pub const WEIGHTS: [f64; COMPONENTS] = [0.22, 0.10, 0.16, 0.17, 0.09, 0.18, 0.08];

/// Prior probability that a sample drawn from each component is a hydrogen bond.
pub const HBOND_PRIORS: [f64; COMPONENTS] = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];

pub const MEANS: [[f64; 3]; COMPONENTS] = [
    [0.10, -2.40, 2.40],
    [0.30, -0.40, 0.50],
    [2.40, -1.20, 1.10],
    [3.30, -0.20, 0.30],
    [1.50, 0.80, -0.60],
    [4.20, 0.10, -0.10],
    [1.00, -1.60, -1.20],
];

pub const INVERSE_COVARIANCES: [[[f64; 3]; 3]; COMPONENTS] = [
    [
        [5.0, 0.0, 0.0],
        [0.0, 0.880576, 0.218325],
        [0.0, 0.218325, 0.880576],
    ],
    [
        [3.333333, 0.0, 0.0],
        [0.0, 1.5625, 0.0],
        [0.0, 0.0, 1.234568],
    ],
    [
        [2.777778, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ],
    [
        [2.040816, 0.0, 0.0],
        [0.0, 0.694444, 0.0],
        [0.0, 0.0, 0.694444],
    ],
    [
        [1.5625, 0.0, 0.0],
        [0.0, 1.234568, 0.0],
        [0.0, 0.0, 1.0],
    ],
    [
        [2.777778, 0.0, 0.0],
        [0.0, 0.591716, 0.0],
        [0.0, 0.0, 0.591716],
    ],
    [
        [2.040816, 0.0, 0.0],
        [0.0, 1.5625, 0.0],
        [0.0, 0.0, 0.826446],
    ],
];

/// Determinants of the (non-inverted) covariance matrices.
pub const DETERMINANTS: [f64; COMPONENTS] = [
    0.27482, 0.15552, 0.36, 1.016064, 0.5184, 1.028196, 0.379456,
];

/// Components whose covariance determinant falls below this are ignored.
pub const MIN_DETERMINANT: f64 = 5e-4;

/// Cosines entering `atanh` are clamped to this magnitude.
pub const COSINE_LIMIT: f64 = 0.9999;

/// Donor-acceptor separation beyond which no bond is considered, in Angstroms.
pub const MAX_DONOR_ACCEPTOR_DISTANCE: f64 = 5.0;

/// Hydrogen-lone pair window of the binary scorer, `[min, max)`.
pub const BINARY_MIN_DISTANCE: f64 = 0.1;
pub const BINARY_MAX_DISTANCE: f64 = 1.65;

/// Geometry of the hydrogen synthesised for a methyl donor.
pub const METHYL_CH_LENGTH: f64 = 1.08;
pub const METHYL_CONE_DEGREES: f64 = 70.0;
