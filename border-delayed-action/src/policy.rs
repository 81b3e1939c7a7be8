//! Per-environment delay of actions.
//!
//! The delay of environment `e` at a control step is
//! `clamp(constant[e] + variable[e], 0, max_delay)`. The constant term is sampled once,
//! when the policy is built, and kept for the lifetime of the environment. The optional
//! variable term is sampled again at every control step.
use crate::config::{ConstantDelayConfig, VariableDelayConfig};
use anyhow::{bail, Result};
use border_core::error::BorderError;
use ndarray::{Array1, ArrayView1, Zip};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::convert::TryFrom;

/// State of the environment loop passed to delay samplers.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayContext {
    /// The number of environments.
    pub num_envs: usize,

    /// The number of control steps processed before the current one.
    pub step: usize,
}

/// Samples a delay, in control steps, for each environment.
pub trait DelaySampler {
    /// Returns `num_envs` delays.
    fn sample(&mut self, num_envs: usize, context: &DelayContext) -> Array1<i64>;
}

impl<F> DelaySampler for F
where
    F: FnMut(usize, &DelayContext) -> Array1<i64>,
{
    fn sample(&mut self, num_envs: usize, context: &DelayContext) -> Array1<i64> {
        self(num_envs, context)
    }
}

/// How the constant delay term is determined.
pub enum ConstantDelay {
    /// The same delay for every environment.
    Fixed(i64),

    /// A delay drawn uniformly from `low..=high` for each environment.
    Uniform {
        /// Lower bound, inclusive.
        low: i64,

        /// Upper bound, inclusive.
        high: i64,
    },

    /// Delays given by the caller, sampled once.
    Custom(Box<dyn DelaySampler>),
}

impl From<ConstantDelayConfig> for ConstantDelay {
    fn from(config: ConstantDelayConfig) -> Self {
        match config {
            ConstantDelayConfig::Fixed { steps } => Self::Fixed(steps),
            ConstantDelayConfig::Uniform { low, high } => Self::Uniform { low, high },
        }
    }
}

/// How the variable delay term is determined.
pub enum VariableDelay {
    /// A delay drawn uniformly from `low..=high` for each environment and step.
    Uniform {
        /// Lower bound, inclusive.
        low: i64,

        /// Upper bound, inclusive.
        high: i64,
    },

    /// Delays given by the caller, sampled at every step.
    Custom(Box<dyn DelaySampler>),
}

impl From<VariableDelayConfig> for VariableDelay {
    fn from(config: VariableDelayConfig) -> Self {
        match config {
            VariableDelayConfig::Uniform { low, high } => Self::Uniform { low, high },
        }
    }
}

fn check_range(low: i64, high: i64) -> Result<()> {
    if low > high {
        bail!("Empty delay range: low = {} > high = {}", low, high);
    }
    Ok(())
}

fn sample_uniform(rng: &mut StdRng, num_envs: usize, low: i64, high: i64) -> Array1<i64> {
    Array1::from_shape_fn(num_envs, |_| rng.gen_range(low..=high))
}

fn check_len(delay: &Array1<i64>, num_envs: usize) -> Result<(), BorderError> {
    if delay.len() != num_envs {
        return Err(BorderError::shape(&[num_envs], delay.shape()));
    }
    Ok(())
}

/// Computes the delay of each environment at every control step.
pub struct DelayPolicy {
    num_envs: usize,
    max_delay: usize,
    constant: Array1<i64>,
    variable: Option<VariableDelay>,
    rng: StdRng,
}

impl DelayPolicy {
    /// Builds a policy and samples its constant term.
    pub fn new(num_envs: usize, max_delay: usize, constant: ConstantDelay, seed: u64) -> Result<Self> {
        let mut policy = Self {
            num_envs,
            max_delay,
            constant: Array1::zeros(num_envs),
            variable: None,
            rng: StdRng::seed_from_u64(seed),
        };
        policy.set_constant_delay(constant)?;
        Ok(policy)
    }

    /// Replaces the constant term with a new sample of `constant`.
    pub fn set_constant_delay(&mut self, constant: ConstantDelay) -> Result<()> {
        let context = DelayContext {
            num_envs: self.num_envs,
            step: 0,
        };
        let delay = match constant {
            ConstantDelay::Fixed(steps) => Array1::from_elem(self.num_envs, steps),
            ConstantDelay::Uniform { low, high } => {
                check_range(low, high)?;
                sample_uniform(&mut self.rng, self.num_envs, low, high)
            }
            ConstantDelay::Custom(mut sampler) => sampler.sample(self.num_envs, &context),
        };
        check_len(&delay, self.num_envs)?;

        self.constant = delay;
        Ok(())
    }

    /// Sets or removes the variable term.
    pub fn set_variable_delay(&mut self, variable: Option<VariableDelay>) -> Result<()> {
        if let Some(VariableDelay::Uniform { low, high }) = &variable {
            check_range(*low, *high)?;
        }
        self.variable = variable;
        Ok(())
    }

    /// The maximum delay.
    pub fn max_delay(&self) -> usize {
        self.max_delay
    }

    /// The constant term, before clamping.
    pub fn constant_term(&self) -> ArrayView1<'_, i64> {
        self.constant.view()
    }

    /// Returns `true` if a variable term is set.
    pub fn has_variable_term(&self) -> bool {
        self.variable.is_some()
    }

    /// Samples the variable term, `None` if not set.
    pub fn variable_term(&mut self, context: &DelayContext) -> Result<Option<Array1<i64>>, BorderError> {
        let num_envs = self.num_envs;
        let delay = match self.variable.as_mut() {
            None => return Ok(None),
            Some(VariableDelay::Uniform { low, high }) => {
                sample_uniform(&mut self.rng, num_envs, *low, *high)
            }
            Some(VariableDelay::Custom(sampler)) => sampler.sample(num_envs, context),
        };
        check_len(&delay, num_envs)?;
        Ok(Some(delay))
    }

    /// The delay of each environment at the current step, in `0..=max_delay`.
    ///
    /// Sums exceeding the range are clamped, which is not an error.
    pub fn effective_delay(&mut self, context: &DelayContext) -> Result<Array1<usize>, BorderError> {
        let max_delay = i64::try_from(self.max_delay).unwrap_or(i64::MAX);
        let delay = match self.variable_term(context)? {
            Some(variable) => Zip::from(&self.constant)
                .and(&variable)
                .map_collect(|&c, &v| c.saturating_add(v)),
            None => self.constant.clone(),
        };
        Ok(delay.mapv(|d| d.clamp(0, max_delay) as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn context(step: usize) -> DelayContext {
        DelayContext { num_envs: 3, step }
    }

    #[test]
    fn test_fixed_constant_delay() -> Result<()> {
        let mut policy = DelayPolicy::new(3, 2, ConstantDelay::Fixed(1), 0)?;
        assert_eq!(policy.constant_term(), array![1i64, 1, 1]);
        assert!(!policy.has_variable_term());

        for step in 0..5 {
            assert_eq!(policy.effective_delay(&context(step))?, array![1usize, 1, 1]);
        }
        Ok(())
    }

    #[test]
    fn test_uniform_constant_delay_is_held() -> Result<()> {
        let mut policy = DelayPolicy::new(64, 3, ConstantDelay::Uniform { low: 0, high: 1 }, 7)?;
        let constant = policy.constant_term().to_owned();
        assert!(constant.iter().all(|&d| d == 0 || d == 1));
        // 64 fair coins are not all equal
        assert!(constant.iter().any(|&d| d == 0));
        assert!(constant.iter().any(|&d| d == 1));

        let context = DelayContext { num_envs: 64, step: 0 };
        for _ in 0..10 {
            assert_eq!(policy.effective_delay(&context)?, constant.mapv(|d| d as usize));
        }
        Ok(())
    }

    #[test]
    fn test_same_seed_same_constant_delay() -> Result<()> {
        let uniform = || ConstantDelay::Uniform { low: 0, high: 5 };
        let p1 = DelayPolicy::new(16, 5, uniform(), 3)?;
        let p2 = DelayPolicy::new(16, 5, uniform(), 3)?;
        assert_eq!(p1.constant_term(), p2.constant_term());
        Ok(())
    }

    #[test]
    fn test_clamping() -> Result<()> {
        let mut policy = DelayPolicy::new(3, 2, ConstantDelay::Fixed(2), 0)?;
        policy.set_variable_delay(Some(VariableDelay::Custom(Box::new(
            |_: usize, _: &DelayContext| array![-5i64, 0, 3],
        ))))?;
        assert_eq!(policy.effective_delay(&context(0))?, array![0usize, 2, 2]);

        // The sum saturates instead of overflowing
        let mut policy = DelayPolicy::new(2, 1, ConstantDelay::Fixed(1), 0)?;
        policy.set_variable_delay(Some(VariableDelay::Custom(Box::new(
            |n: usize, _: &DelayContext| Array1::from_elem(n, i64::MAX),
        ))))?;
        assert_eq!(
            policy.effective_delay(&DelayContext { num_envs: 2, step: 0 })?,
            array![1usize, 1]
        );

        let mut policy = DelayPolicy::new(2, 1, ConstantDelay::Fixed(-1), 0)?;
        policy.set_variable_delay(Some(VariableDelay::Custom(Box::new(
            |n: usize, _: &DelayContext| Array1::from_elem(n, i64::MIN),
        ))))?;
        assert_eq!(
            policy.effective_delay(&DelayContext { num_envs: 2, step: 0 })?,
            array![0usize, 0]
        );

        // Negative constant, no variable term
        let mut policy = DelayPolicy::new(3, 2, ConstantDelay::Fixed(-1), 0)?;
        assert_eq!(policy.effective_delay(&context(0))?, array![0usize, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_variable_delay_sees_context() -> Result<()> {
        let mut policy = DelayPolicy::new(3, 4, ConstantDelay::Fixed(1), 0)?;
        policy.set_variable_delay(Some(VariableDelay::Custom(Box::new(
            |n: usize, ctx: &DelayContext| Array1::from_elem(n, (ctx.step % 2) as i64),
        ))))?;

        assert_eq!(policy.effective_delay(&context(0))?, array![1usize, 1, 1]);
        assert_eq!(policy.effective_delay(&context(1))?, array![2usize, 2, 2]);
        Ok(())
    }

    #[test]
    fn test_uniform_variable_delay_range() -> Result<()> {
        let mut policy = DelayPolicy::new(3, 10, ConstantDelay::Fixed(2), 0)?;
        policy.set_variable_delay(Some(VariableDelay::Uniform { low: 0, high: 3 }))?;

        for step in 0..50 {
            let delay = policy.effective_delay(&context(step))?;
            assert!(delay.iter().all(|&d| (2..=5).contains(&d)));
        }
        Ok(())
    }

    #[test]
    fn test_invalid_samplers() {
        assert!(DelayPolicy::new(3, 1, ConstantDelay::Uniform { low: 2, high: 1 }, 0).is_err());

        let sampler = |_: usize, _: &DelayContext| array![1i64, 1];
        assert!(DelayPolicy::new(3, 1, ConstantDelay::Custom(Box::new(sampler)), 0).is_err());

        let mut policy = DelayPolicy::new(3, 1, ConstantDelay::Fixed(0), 0).unwrap();
        policy
            .set_variable_delay(Some(VariableDelay::Custom(Box::new(sampler))))
            .unwrap();
        assert_eq!(
            policy.effective_delay(&context(0)),
            Err(BorderError::shape(&[3], &[2]))
        );
    }
}
