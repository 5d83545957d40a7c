//! Adaptive Dormand–Prince 5(4) integrator with dense output
//!
//! Step sizes are picked by the embedded error estimate alone. Requested
//! sample times are filled in afterwards from the quartic continuous
//! extension of each accepted step, so changing the number of samples never
//! changes the step grid.

use serde::{Deserialize, Serialize};

use super::error::{InputError, SolveError, SolveResult};

/// A first-order system `dy/dt = f(t, y)`
pub trait OdeSystem {
    /// Number of state variables
    fn dim(&self) -> usize;

    /// Write `f(t, y)` into `dydt`
    fn derivative(&self, t: f64, y: &[f64], dydt: &mut [f64]) -> SolveResult<()>;
}

/// Error control settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    /// Relative tolerance
    pub rtol: f64,
    /// Absolute tolerance
    pub atol: f64,
    /// Upper bound on step attempts (accepted + rejected)
    pub max_steps: usize,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            rtol: 1e-6,
            atol: 1e-9,
            max_steps: 500_000,
        }
    }
}

impl IntegratorConfig {
    pub fn validate(&self) -> SolveResult<()> {
        if !self.rtol.is_finite() || self.rtol <= 0.0 {
            return Err(InputError::InvalidTolerance(format!("rtol = {}", self.rtol)).into());
        }
        if !self.atol.is_finite() || self.atol <= 0.0 {
            return Err(InputError::InvalidTolerance(format!("atol = {}", self.atol)).into());
        }
        if self.max_steps == 0 {
            return Err(InputError::InvalidTolerance("max_steps = 0".to_string()).into());
        }
        Ok(())
    }
}

/// Work counters for one integration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrationStats {
    pub accepted: usize,
    pub rejected: usize,
    pub evaluations: usize,
}

/// States at the requested sample times
#[derive(Debug, Clone)]
pub struct DenseSolution {
    pub samples: Vec<Vec<f64>>,
    pub stats: IntegrationStats,
}

// Dormand–Prince tableau
const C: [f64; 6] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0];

const A: [[f64; 5]; 6] = [
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
    ],
];

const B: [f64; 6] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
];

/// Difference between the 5th and embedded 4th order weights (7 stages, FSAL)
const E: [f64; 7] = [
    -71.0 / 57600.0,
    0.0,
    71.0 / 16695.0,
    -71.0 / 1920.0,
    17253.0 / 339200.0,
    -22.0 / 525.0,
    1.0 / 40.0,
];

/// Continuous extension: y(t + θh) = y + h Σ_s k_s Σ_j P[s][j] θ^(j+1)
const P: [[f64; 4]; 7] = [
    [
        1.0,
        -8048581381.0 / 2820520608.0,
        8663915743.0 / 2820520608.0,
        -12715105075.0 / 11282082432.0,
    ],
    [0.0, 0.0, 0.0, 0.0],
    [
        0.0,
        131558114200.0 / 32700410799.0,
        -68118460800.0 / 10900136933.0,
        87487479700.0 / 32700410799.0,
    ],
    [
        0.0,
        -1754552775.0 / 470086768.0,
        14199869525.0 / 1410260304.0,
        -10690763975.0 / 1880347072.0,
    ],
    [
        0.0,
        127303824393.0 / 49829197408.0,
        -318862633887.0 / 49829197408.0,
        701980252875.0 / 199316789632.0,
    ],
    [
        0.0,
        -282668133.0 / 205662961.0,
        2019193451.0 / 616988883.0,
        -1453857185.0 / 822651844.0,
    ],
    [
        0.0,
        40617522.0 / 29380423.0,
        -110615467.0 / 29380423.0,
        69997945.0 / 29380423.0,
    ],
];

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;
/// -1 / (embedded order + 1)
const ERROR_EXPONENT: f64 = -1.0 / 5.0;

/// Integrate `system` from t = 0 to `t_end`, sampling at `sample_times`
///
/// `sample_times` must be non-decreasing and lie in `[0, t_end]`. Samples at
/// t = 0 are the exact initial state and need no integration at all.
pub fn integrate<S: OdeSystem>(
    system: &S,
    y0: &[f64],
    t_end: f64,
    sample_times: &[f64],
    config: &IntegratorConfig,
) -> SolveResult<DenseSolution> {
    config.validate()?;
    let sorted = sample_times.windows(2).all(|w| w[0] <= w[1]);
    let in_range = sample_times
        .iter()
        .all(|&s| s.is_finite() && s >= 0.0 && s <= t_end);
    if !sorted || !in_range {
        return Err(InputError::BadSampleTimes { t_end }.into());
    }
    debug_assert_eq!(system.dim(), y0.len());

    let mut stats = IntegrationStats::default();
    let mut samples = Vec::with_capacity(sample_times.len());
    let mut next = 0;
    while next < sample_times.len() && sample_times[next] <= 0.0 {
        samples.push(y0.to_vec());
        next += 1;
    }
    if next == sample_times.len() {
        return Ok(DenseSolution { samples, stats });
    }

    let n = y0.len();
    let mut t = 0.0;
    let mut y = y0.to_vec();
    let mut y_new = vec![0.0; n];
    let mut scratch = vec![0.0; n];
    let mut k: [Vec<f64>; 7] = std::array::from_fn(|_| vec![0.0; n]);

    evaluate(system, t, &y, &mut k[0], &mut stats)?;
    let mut h = initial_step(system, t, &y, &k[0], t_end, config, &mut stats)?;

    while t < t_end {
        let mut rejected_once = false;
        let (t_new, h_next) = loop {
            if stats.accepted + stats.rejected >= config.max_steps {
                return Err(SolveError::NonConvergence { time: t, step: h });
            }
            let min_step = 10.0 * ulp(t);
            if h < min_step {
                return Err(SolveError::NonConvergence { time: t, step: h });
            }
            let t_new = (t + h).min(t_end);
            h = t_new - t;

            rk_step(system, t, &y, h, &mut k, &mut y_new, &mut scratch, &mut stats)?;
            let err = error_norm(&y, &y_new, &k, h, config);
            if !err.is_finite() {
                return Err(SolveError::numerical(t, "error estimate is not finite"));
            }

            if err < 1.0 {
                let mut factor = if err == 0.0 {
                    MAX_FACTOR
                } else {
                    MAX_FACTOR.min(SAFETY * err.powf(ERROR_EXPONENT))
                };
                if rejected_once {
                    factor = factor.min(1.0);
                }
                stats.accepted += 1;
                break (t_new, h * factor);
            }

            h *= MIN_FACTOR.max(SAFETY * err.powf(ERROR_EXPONENT));
            rejected_once = true;
            stats.rejected += 1;
        };

        while next < sample_times.len() && sample_times[next] <= t_new {
            let s = sample_times[next];
            if s >= t_new {
                samples.push(y_new.clone());
            } else {
                samples.push(dense_eval(&y, &k, h, (s - t) / h));
            }
            next += 1;
        }

        t = t_new;
        std::mem::swap(&mut y, &mut y_new);
        let (head, tail) = k.split_at_mut(6);
        head[0].copy_from_slice(&tail[0]);
        h = h_next;
    }

    // Anything left sits at t_end within rounding
    while samples.len() < sample_times.len() {
        samples.push(y.clone());
    }

    Ok(DenseSolution { samples, stats })
}

fn evaluate<S: OdeSystem>(
    system: &S,
    t: f64,
    y: &[f64],
    out: &mut [f64],
    stats: &mut IntegrationStats,
) -> SolveResult<()> {
    stats.evaluations += 1;
    system.derivative(t, y, out)?;
    if out.iter().any(|v| !v.is_finite()) {
        return Err(SolveError::numerical(t, "derivative is not finite"));
    }
    Ok(())
}

/// One Dormand–Prince step. Expects `k[0] = f(t, y)`, leaves `k[6] = f(t + h, y_new)`.
#[allow(clippy::too_many_arguments)]
fn rk_step<S: OdeSystem>(
    system: &S,
    t: f64,
    y: &[f64],
    h: f64,
    k: &mut [Vec<f64>; 7],
    y_new: &mut [f64],
    scratch: &mut [f64],
    stats: &mut IntegrationStats,
) -> SolveResult<()> {
    for s in 1..6 {
        for i in 0..y.len() {
            let mut acc = 0.0;
            for (j, a) in A[s][..s].iter().enumerate() {
                acc += a * k[j][i];
            }
            scratch[i] = y[i] + h * acc;
        }
        evaluate(system, t + C[s] * h, scratch, &mut k[s], stats)?;
    }

    for i in 0..y.len() {
        let mut acc = 0.0;
        for (s, b) in B.iter().enumerate() {
            acc += b * k[s][i];
        }
        y_new[i] = y[i] + h * acc;
    }
    evaluate(system, t + h, y_new, &mut k[6], stats)
}

fn error_norm(y: &[f64], y_new: &[f64], k: &[Vec<f64>; 7], h: f64, config: &IntegratorConfig) -> f64 {
    let mut sum = 0.0;
    for i in 0..y.len() {
        let mut err = 0.0;
        for (s, e) in E.iter().enumerate() {
            err += e * k[s][i];
        }
        let scale = config.atol + y[i].abs().max(y_new[i].abs()) * config.rtol;
        let ratio = h * err / scale;
        sum += ratio * ratio;
    }
    (sum / y.len() as f64).sqrt()
}

/// Interpolate within the last accepted step at fraction `theta` of `h`
fn dense_eval(y: &[f64], k: &[Vec<f64>; 7], h: f64, theta: f64) -> Vec<f64> {
    let powers = [theta, theta * theta, theta.powi(3), theta.powi(4)];
    let mut out = y.to_vec();
    for (i, value) in out.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (s, row) in P.iter().enumerate() {
            let weight: f64 = row.iter().zip(&powers).map(|(p, x)| p * x).sum();
            acc += k[s][i] * weight;
        }
        *value += h * acc;
    }
    out
}

/// Starting step from the local Lipschitz estimate (Hairer, Nørsett & Wanner)
fn initial_step<S: OdeSystem>(
    system: &S,
    t0: f64,
    y0: &[f64],
    f0: &[f64],
    t_end: f64,
    config: &IntegratorConfig,
    stats: &mut IntegrationStats,
) -> SolveResult<f64> {
    let interval = t_end - t0;
    let scale: Vec<f64> = y0.iter().map(|y| config.atol + y.abs() * config.rtol).collect();
    let d0 = rms(y0.iter().zip(&scale).map(|(y, s)| y / s));
    let d1 = rms(f0.iter().zip(&scale).map(|(f, s)| f / s));

    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    }
    .min(interval);

    let y1: Vec<f64> = y0.iter().zip(f0).map(|(y, f)| y + h0 * f).collect();
    let mut f1 = vec![0.0; y0.len()];
    evaluate(system, t0 + h0, &y1, &mut f1, stats)?;
    let d2 = rms(f1.iter().zip(f0).zip(&scale).map(|((a, b), s)| (a - b) / s)) / h0;

    let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(1.0 / 5.0)
    };

    Ok((100.0 * h0).min(h1).min(interval))
}

fn rms(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v * v;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        (sum / count as f64).sqrt()
    }
}

/// Gap between `t` and the next larger float
fn ulp(t: f64) -> f64 {
    let t = t.abs();
    f64::from_bits(t.to_bits() + 1) - t
}
