//! Leave-one-out cross-validation and polynomial model-order selection.
//!
//! ```
//! use resampling_stats::cross_validation::select_polynomial_degree;
//!
//! let x = [-1.0, -0.6, -0.2, 0.1, 0.4, 0.7, 1.0, 1.3];
//! let y = x.map(|v: f64| 1.0 + 0.5 * v - 2.0 * v * v);
//! let selection = select_polynomial_degree(&x, &y, &[0, 1, 2]).unwrap();
//! assert_eq!(selection.best_degree, 2);
//! ```

use serde::Serialize;

use crate::{
    error::{ResampleError, Result, ensure_non_empty, ensure_same_len},
    jackknife::LeaveOneOut,
};

/// Held-out prediction errors of a model.
#[derive(Debug, Clone, Serialize)]
pub struct CrossValidation {
    /// Sum of squared held-out residuals.
    pub rss: f64,
    /// `y[i] - prediction[i]` where the prediction comes from a model fitted
    /// without observation `i`.
    pub residuals: Vec<f64>,
}

/// Leave-one-out cross-validation of a model family.
///
/// For every index `i`, `fit` is called on all points except `i` and the
/// resulting model predicts `x[i]` only.
pub fn loocv<M, Fit, Predict>(
    x: &[f64],
    y: &[f64],
    mut fit: Fit,
    predict: Predict,
) -> Result<CrossValidation>
where
    Fit: FnMut(&[f64], &[f64]) -> Result<M>,
    Predict: Fn(&M, f64) -> f64,
{
    ensure_same_len(x, y, "loocv")?;
    if x.len() < 2 {
        return Err(ResampleError::InsufficientData {
            what: "leave-one-out cross-validation",
            needed: 2,
            got: x.len(),
        });
    }

    let mut train_x = LeaveOneOut::new(x);
    let mut train_y = LeaveOneOut::new(y);
    let mut residuals = Vec::with_capacity(x.len());
    for i in 0..x.len() {
        let model = fit(train_x.without(i), train_y.without(i))?;
        residuals.push(y[i] - predict(&model, x[i]));
    }
    let rss = residuals.iter().map(|r| r * r).sum();
    Ok(CrossValidation { rss, residuals })
}

/// Polynomial `Σ coefficients[i] · xⁱ`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polynomial {
    /// Lowest order first.
    pub coefficients: Vec<f64>,
}

impl Polynomial {
    /// Least-squares fit of a polynomial of the given degree.
    ///
    /// Solves the normal equations `XᵀX β = Xᵀy` by Gaussian elimination with
    /// partial pivoting.
    pub fn fit(x: &[f64], y: &[f64], degree: usize) -> Result<Self> {
        ensure_same_len(x, y, "polynomial fit")?;
        ensure_non_empty(x, "x")?;
        let terms = degree + 1;
        if x.len() < terms {
            return Err(ResampleError::InsufficientData {
                what: "polynomial fit",
                needed: terms,
                got: x.len(),
            });
        }

        // Augmented [XᵀX | Xᵀy], row-major
        let width = terms + 1;
        let mut system = vec![0.0; terms * width];
        let mut powers = vec![0.0; 2 * terms - 1];
        for (&xi, &yi) in x.iter().zip(y) {
            let mut p = 1.0;
            for (k, slot) in powers.iter_mut().enumerate() {
                *slot = p;
                if k < terms {
                    system[k * width + terms] += p * yi;
                }
                p *= xi;
            }
            for row in 0..terms {
                for col in 0..terms {
                    system[row * width + col] += powers[row + col];
                }
            }
        }

        let coefficients = solve_augmented(&mut system, terms)?;
        Ok(Self { coefficients })
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Value at `x` by Horner's rule.
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }

    /// Residual sum of squares over `(x, y)`.
    #[must_use]
    pub fn rss(&self, x: &[f64], y: &[f64]) -> f64 {
        x.iter()
            .zip(y)
            .map(|(&xi, &yi)| (yi - self.evaluate(xi)).powi(2))
            .sum()
    }
}

fn solve_augmented(system: &mut [f64], n: usize) -> Result<Vec<f64>> {
    let width = n + 1;
    let scale = (0..n)
        .map(|i| system[i * width + i].abs())
        .fold(0.0, f64::max);
    let tolerance = scale * 1e-13;

    for col in 0..n {
        let (pivot_row, pivot_abs) = (col..n)
            .map(|row| (row, system[row * width + col].abs()))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap_or((col, 0.0));
        if pivot_abs.is_nan() || pivot_abs <= tolerance {
            return Err(ResampleError::SingularSystem);
        }
        if pivot_row != col {
            for j in 0..width {
                system.swap(col * width + j, pivot_row * width + j);
            }
        }

        let pivot = system[col * width + col];
        for row in col + 1..n {
            let factor = system[row * width + col] / pivot;
            if factor == 0.0 {
                continue;
            }
            for j in col..width {
                system[row * width + j] -= factor * system[col * width + j];
            }
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let tail = (row + 1..n)
            .map(|j| system[row * width + j] * solution[j])
            .sum::<f64>();
        solution[row] = (system[row * width + n] - tail) / system[row * width + row];
    }
    Ok(solution)
}

/// Fit quality of one candidate degree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DegreeScore {
    pub degree: usize,
    /// RSS of the fit on all points. Never increases with the degree.
    pub in_sample_rss: f64,
    /// RSS of the held-out predictions.
    pub loocv_rss: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelSelection {
    pub candidates: Vec<DegreeScore>,
    /// Degree with the smallest LOOCV RSS; the lowest such degree on ties.
    pub best_degree: usize,
}

/// Scores each polynomial degree by in-sample and leave-one-out RSS.
///
/// Every degree needs at least `degree + 2` points so that each held-out fit
/// stays determined.
pub fn select_polynomial_degree(x: &[f64], y: &[f64], degrees: &[usize]) -> Result<ModelSelection> {
    ensure_same_len(x, y, "model selection")?;
    ensure_non_empty(degrees, "degrees")?;

    let mut candidates = Vec::with_capacity(degrees.len());
    for &degree in degrees {
        if x.len() < degree + 2 {
            return Err(ResampleError::InsufficientData {
                what: "leave-one-out polynomial fit",
                needed: degree + 2,
                got: x.len(),
            });
        }
        let full = Polynomial::fit(x, y, degree)?;
        let cv = loocv(
            x,
            y,
            |tx, ty| Polynomial::fit(tx, ty, degree),
            Polynomial::evaluate,
        )?;
        candidates.push(DegreeScore {
            degree,
            in_sample_rss: full.rss(x, y),
            loocv_rss: cv.rss,
        });
    }

    let best_degree = candidates
        .iter()
        .min_by(|a, b| a.loocv_rss.total_cmp(&b.loocv_rss))
        .map_or(0, |c| c.degree);
    Ok(ModelSelection {
        candidates,
        best_degree,
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::synthetic;

    #[test]
    fn test_exact_line_is_recovered() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = x.map(|v| 2.0 + 3.0 * v);
        let poly = Polynomial::fit(&x, &y, 1).unwrap();
        assert!((poly.coefficients[0] - 2.0).abs() < 1e-9);
        assert!((poly.coefficients[1] - 3.0).abs() < 1e-9);
        assert!(poly.rss(&x, &y) < 1e-18);
        assert_eq!(poly.degree(), 1);
    }

    #[test]
    fn test_horner_evaluation() {
        let poly = Polynomial {
            coefficients: vec![1.0, -2.0, 0.5],
        };
        assert_eq!(poly.evaluate(2.0), 1.0 - 4.0 + 2.0);
        assert_eq!(poly.evaluate(0.0), 1.0);
    }

    #[test]
    fn test_constant_x_is_singular() {
        let x = [2.0, 2.0, 2.0];
        let y = [1.0, 2.0, 3.0];
        assert_eq!(
            Polynomial::fit(&x, &y, 1).unwrap_err(),
            ResampleError::SingularSystem
        );
    }

    #[test]
    fn test_loocv_of_mean_model() {
        // Held-out residual of the mean model is (y_i - ȳ) · n / (n - 1)
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 2.0, 6.0];
        let cv = loocv(&x, &y, |tx, ty| Polynomial::fit(tx, ty, 0), Polynomial::evaluate).unwrap();
        let mean = 3.0;
        for (r, yi) in cv.residuals.iter().zip(y) {
            assert!((r - (yi - mean) * 4.0 / 3.0).abs() < 1e-12);
        }
        let rss = cv.residuals.iter().map(|r| r * r).sum::<f64>();
        assert!((cv.rss - rss).abs() < 1e-12);
    }

    #[test]
    fn test_loocv_propagates_fit_errors() {
        let x = [1.0, 1.0, 1.0];
        let y = [0.0, 1.0, 2.0];
        let result = loocv(&x, &y, |tx, ty| Polynomial::fit(tx, ty, 1), Polynomial::evaluate);
        assert_eq!(result.unwrap_err(), ResampleError::SingularSystem);
    }

    #[test]
    fn test_selects_quadratic_for_quadratic_data() {
        let mut rng = Pcg64::seed_from_u64(31);
        let (x, y) =
            synthetic::polynomial_data(&mut rng, &[1.0, -2.0, 3.0], -1.0, 1.0, 0.3, 60).unwrap();
        let degrees = (0..=6).collect::<Vec<_>>();
        let selection = select_polynomial_degree(&x, &y, &degrees).unwrap();

        assert_eq!(selection.candidates.len(), 7);
        assert!(
            (2..=5).contains(&selection.best_degree),
            "best = {}",
            selection.best_degree
        );
        for pair in selection.candidates.windows(2) {
            assert!(pair[1].in_sample_rss <= pair[0].in_sample_rss + 1e-9);
        }
        // Under-fitting models predict held-out points badly
        let best = selection.candidates[selection.best_degree].loocv_rss;
        assert!(selection.candidates[1].loocv_rss > 2.0 * best);
    }

    #[test]
    fn test_selection_needs_enough_points() {
        let x = [0.0, 1.0, 2.0];
        let y = [0.0, 1.0, 4.0];
        assert_eq!(
            select_polynomial_degree(&x, &y, &[2]).unwrap_err(),
            ResampleError::InsufficientData {
                what: "leave-one-out polynomial fit",
                needed: 4,
                got: 3
            }
        );
    }
}
