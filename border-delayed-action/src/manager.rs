//! Action manager.
use border_core::{error::BorderError, record::Record, ActionTerm, EnvContext, EnvIds, Scene};
use log::info;
use ndarray::{s, Array2, ArrayView2};

/// Splits the batched action of an environment across a sequence of action terms.
///
/// Columns of the `N × total_action_dim` action are given to the terms in the order the
/// terms were added, each term taking [`ActionTerm::action_dim`] columns.
pub struct ActionManager<S: Scene> {
    num_envs: usize,
    terms: Vec<(String, Box<dyn ActionTerm<S>>)>,
    action: Array2<f32>,
}

impl<S: Scene> ActionManager<S> {
    /// Constructs a manager without terms.
    pub fn new(context: &EnvContext) -> Self {
        Self {
            num_envs: context.num_envs,
            terms: vec![],
            action: Array2::zeros((context.num_envs, 0)),
        }
    }

    /// Appends an action term.
    pub fn add_term<T>(&mut self, name: impl Into<String>, term: T) -> &mut Self
    where
        T: ActionTerm<S> + 'static,
    {
        let name = name.into();
        info!("Action term {:?} added, action_dim = {}", name, term.action_dim());
        self.terms.push((name, Box::new(term)));
        self.action = Array2::zeros((self.num_envs, self.total_action_dim()));
        self
    }

    /// Appends an action term, builder style.
    pub fn term<T>(mut self, name: impl Into<String>, term: T) -> Self
    where
        T: ActionTerm<S> + 'static,
    {
        self.add_term(name, term);
        self
    }

    /// Names of the terms, in order.
    pub fn term_names(&self) -> Vec<&str> {
        self.terms.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Returns the term with the given name.
    pub fn get_term(&self, name: &str) -> Option<&dyn ActionTerm<S>> {
        self.terms
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, term)| term.as_ref())
    }

    /// The sum of action dimensions of the terms.
    pub fn total_action_dim(&self) -> usize {
        self.terms.iter().map(|(_, term)| term.action_dim()).sum()
    }

    /// The action received in the last call of [`ActionManager::process_action`].
    pub fn action(&self) -> ArrayView2<'_, f32> {
        self.action.view()
    }

    /// Dispatches the action of the current control step to the terms.
    ///
    /// Records of the terms are merged, with keys prefixed by the term names.
    pub fn process_action(&mut self, action: ArrayView2<'_, f32>) -> Result<Record, BorderError> {
        let expected = [self.num_envs, self.total_action_dim()];
        if action.shape() != &expected[..] {
            return Err(BorderError::shape(&expected, action.shape()));
        }
        self.action.assign(&action);

        let mut record = Record::empty();
        let mut ix = 0;
        for (name, term) in self.terms.iter_mut() {
            let dim = term.action_dim();
            let r = term.process_actions(action.slice(s![.., ix..ix + dim]))?;
            record.merge_inplace(r.with_prefix(name.as_str()));
            ix += dim;
        }

        Ok(record)
    }

    /// Sends the commands of the terms to the scene.
    ///
    /// Called once per physics sub-step.
    pub fn apply_action(&self, scene: &mut S) -> Result<(), BorderError> {
        for (_, term) in self.terms.iter() {
            term.apply_actions(scene)?;
        }
        Ok(())
    }

    /// Resets the terms for the given environments.
    pub fn reset(&mut self, env_ids: EnvIds<'_>) {
        for (_, term) in self.terms.iter_mut() {
            term.reset(env_ids);
        }
        match env_ids {
            None => self.action.fill(0.0),
            Some(ids) => {
                let n = self.num_envs;
                for &i in ids.iter().filter(|&&i| i < n) {
                    self.action.row_mut(i).fill(0.0);
                }
            }
        }
    }
}
