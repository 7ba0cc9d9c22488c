use log::{debug, warn};
use std::collections::VecDeque;

const ARMIJO_FTOL: f64 = 1e-4;
const MIN_CURVATURE: f64 = 1e-10;

/// Settings for [`minimize`].
#[derive(Debug, Clone, Copy)]
pub struct LbfgsConfig {
    /// Number of correction pairs kept for the inverse Hessian approximation.
    pub num_memories: usize,
    pub max_iterations: usize,
    /// Stop when `||pseudo_gradient|| / max(1, ||x||)` drops to this value.
    pub epsilon: f64,
    /// Stop when the relative objective decrease over `period` iterations drops below this value.
    pub delta: f64,
    pub period: usize,
    pub max_linesearch: usize,
    /// L1 coefficient. A positive value switches on the orthant-wise (OWL-QN) updates.
    pub c1: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LbfgsStatus {
    Converged,
    Stalled,
    MaxIterations,
    LineSearchFailed,
}

#[derive(Debug, Clone)]
pub struct LbfgsOutcome {
    pub x: Vec<f64>,
    pub fx: f64,
    pub iterations: usize,
    pub status: LbfgsStatus,
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

fn l1_norm(a: &[f64]) -> f64 {
    a.iter().map(|v| v.abs()).sum()
}

/// Subgradient of `f(x) + c1 * |x|_1` with the smallest magnitude.
fn pseudo_gradient(x: &[f64], g: &[f64], c1: f64) -> Vec<f64> {
    if c1 == 0.0 {
        return g.to_vec();
    }

    x.iter()
        .zip(g)
        .map(|(&xi, &gi)| {
            if xi < 0.0 {
                gi - c1
            } else if xi > 0.0 {
                gi + c1
            } else if gi < -c1 {
                gi + c1
            } else if gi > c1 {
                gi - c1
            } else {
                0.0
            }
        })
        .collect()
}

struct Correction {
    s: Vec<f64>,
    y: Vec<f64>,
    ys: f64,
}

/// Two-loop recursion: approximates `-H * pg` from the stored corrections.
fn search_direction(pg: &[f64], history: &VecDeque<Correction>) -> Vec<f64> {
    let mut q: Vec<f64> = pg.iter().map(|v| -v).collect();
    let mut alphas = vec![0.0; history.len()];

    for (i, correction) in history.iter().enumerate().rev() {
        let alpha = dot(&correction.s, &q) / correction.ys;
        alphas[i] = alpha;
        for (qj, yj) in q.iter_mut().zip(&correction.y) {
            *qj -= alpha * yj;
        }
    }

    if let Some(newest) = history.back() {
        let gamma = newest.ys / dot(&newest.y, &newest.y);
        q.iter_mut().for_each(|qj| *qj *= gamma);
    }

    for (i, correction) in history.iter().enumerate() {
        let beta = dot(&correction.y, &q) / correction.ys;
        for (qj, sj) in q.iter_mut().zip(&correction.s) {
            *qj += sj * (alphas[i] - beta);
        }
    }

    q
}

/// Minimizes `f(x) + c1 * |x|_1` with limited-memory BFGS.
///
/// `evaluate` returns the smooth part of the objective at `x` and writes its
/// gradient into the second argument. With `c1 > 0` the search directions and
/// line search steps are kept inside the current orthant, as in OWL-QN, so
/// coordinates can settle at exactly zero.
pub fn minimize<F>(mut evaluate: F, x0: Vec<f64>, config: &LbfgsConfig) -> LbfgsOutcome
where
    F: FnMut(&[f64], &mut [f64]) -> f64,
{
    let n = x0.len();
    let c1 = config.c1;

    let mut x = x0;
    let mut g = vec![0.0; n];
    let mut fx = evaluate(&x, &mut g) + c1 * l1_norm(&x);
    let mut pg = pseudo_gradient(&x, &g, c1);

    if norm(&pg) / norm(&x).max(1.0) <= config.epsilon {
        return LbfgsOutcome {
            x,
            fx,
            iterations: 0,
            status: LbfgsStatus::Converged,
        };
    }

    let mut history: VecDeque<Correction> = VecDeque::with_capacity(config.num_memories);
    let mut past_fx: VecDeque<f64> = VecDeque::with_capacity(config.period);

    let mut d: Vec<f64> = pg.iter().map(|v| -v).collect();
    let mut step = 1.0 / norm(&d);

    let mut x_new = vec![0.0; n];
    let mut g_new = vec![0.0; n];

    for iteration in 1..=config.max_iterations {
        if c1 > 0.0 {
            for (di, pgi) in d.iter_mut().zip(&pg) {
                if *di * pgi >= 0.0 {
                    *di = 0.0;
                }
            }
        }

        let orthant: Vec<f64> = x
            .iter()
            .zip(&pg)
            .map(|(&xi, &pgi)| if xi != 0.0 { xi.signum() } else { -pgi.signum() })
            .collect();

        let mut accepted = None;

        for _ in 0..config.max_linesearch {
            for i in 0..n {
                x_new[i] = x[i] + step * d[i];
                if c1 > 0.0 && x_new[i] * orthant[i] <= 0.0 {
                    x_new[i] = 0.0;
                }
            }

            let f_new = evaluate(&x_new, &mut g_new) + c1 * l1_norm(&x_new);

            let decrease: f64 = x_new
                .iter()
                .zip(&x)
                .zip(&pg)
                .map(|((xn, xo), p)| (xn - xo) * p)
                .sum();

            if f_new <= fx + ARMIJO_FTOL * decrease {
                accepted = Some(f_new);
                break;
            }

            step *= 0.5;
        }

        let Some(f_new) = accepted else {
            warn!(
                "Line search made no progress at iteration {}; keeping objective {:.6}",
                iteration, fx
            );
            return LbfgsOutcome {
                x,
                fx,
                iterations: iteration - 1,
                status: LbfgsStatus::LineSearchFailed,
            };
        };

        let s: Vec<f64> = x_new.iter().zip(&x).map(|(a, b)| a - b).collect();
        let y: Vec<f64> = g_new.iter().zip(&g).map(|(a, b)| a - b).collect();

        std::mem::swap(&mut x, &mut x_new);
        std::mem::swap(&mut g, &mut g_new);
        fx = f_new;
        pg = pseudo_gradient(&x, &g, c1);

        debug!("Iteration {}: objective {:.6}, step {:.4}", iteration, fx, step);

        if norm(&pg) / norm(&x).max(1.0) <= config.epsilon {
            return LbfgsOutcome {
                x,
                fx,
                iterations: iteration,
                status: LbfgsStatus::Converged,
            };
        }

        if config.period > 0 {
            if past_fx.len() == config.period {
                if let Some(oldest) = past_fx.pop_front() {
                    let rate = (oldest - fx) / fx.abs().max(f64::EPSILON);
                    if rate < config.delta {
                        return LbfgsOutcome {
                            x,
                            fx,
                            iterations: iteration,
                            status: LbfgsStatus::Stalled,
                        };
                    }
                }
            }
            past_fx.push_back(fx);
        }

        let ys = dot(&y, &s);
        if ys > MIN_CURVATURE {
            if history.len() == config.num_memories {
                history.pop_front();
            }
            history.push_back(Correction { s, y, ys });
        }

        d = search_direction(&pg, &history);
        step = 1.0;
    }

    LbfgsOutcome {
        x,
        fx,
        iterations: config.max_iterations,
        status: LbfgsStatus::MaxIterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(c1: f64) -> LbfgsConfig {
        LbfgsConfig {
            num_memories: 6,
            max_iterations: 100,
            epsilon: 1e-8,
            delta: 0.0,
            period: 10,
            max_linesearch: 40,
            c1,
        }
    }

    #[test]
    fn test_minimizes_quadratic() {
        let outcome = minimize(
            |x, g| {
                g[0] = 2.0 * (x[0] - 3.0);
                g[1] = 8.0 * (x[1] + 1.0);
                (x[0] - 3.0).powi(2) + 4.0 * (x[1] + 1.0).powi(2)
            },
            vec![0.0, 0.0],
            &config(0.0),
        );

        assert!((outcome.x[0] - 3.0).abs() < 1e-4, "{:?}", outcome);
        assert!((outcome.x[1] + 1.0).abs() < 1e-4, "{:?}", outcome);
        assert!(outcome.fx < 1e-8);
    }

    #[test]
    fn test_l1_drives_weak_coordinate_to_zero() {
        // argmin (x - 0.3)^2 + |x| is exactly 0
        let outcome = minimize(
            |x, g| {
                g[0] = 2.0 * (x[0] - 0.3);
                (x[0] - 0.3).powi(2)
            },
            vec![2.0],
            &config(1.0),
        );

        assert_eq!(outcome.x[0], 0.0);
        assert_eq!(outcome.status, LbfgsStatus::Converged);
    }

    #[test]
    fn test_l1_shrinks_strong_coordinate() {
        // argmin (x - 2)^2 + |x| is 1.5
        let outcome = minimize(
            |x, g| {
                g[0] = 2.0 * (x[0] - 2.0);
                (x[0] - 2.0).powi(2)
            },
            vec![0.0],
            &config(1.0),
        );

        assert!((outcome.x[0] - 1.5).abs() < 1e-6, "{:?}", outcome);
    }

    #[test]
    fn test_starting_at_optimum_converges_immediately() {
        let outcome = minimize(
            |x, g| {
                g[0] = 2.0 * x[0];
                x[0] * x[0]
            },
            vec![0.0],
            &config(0.0),
        );

        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.status, LbfgsStatus::Converged);
    }
}
