//! Selected variable and mapping mode, plus the observers re-rendered on change.
//!
//! `ViewController` is the single writer. Each transition mutates the state
//! and then runs every observer against the new snapshot before returning, so
//! no observer can see a half-applied switch. Observers always re-derive from
//! the full snapshot; there are no diffs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::VariableCatalog;
use crate::error::{AtlasError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Univariate,
    Bivariate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    /// Last selected variable. Kept but ignored while bivariate.
    pub variable: String,
    pub mode: Mode,
}

impl ViewState {
    /// Univariate on the first catalog variable.
    pub fn initial(catalog: &VariableCatalog) -> Self {
        Self { variable: catalog.first().key.clone(), mode: Mode::Univariate }
    }

    pub fn is_bivariate(&self) -> bool {
        self.mode == Mode::Bivariate
    }
}

pub type Observer = Box<dyn FnMut(&ViewState)>;

pub struct ViewController {
    catalog: VariableCatalog,
    state: ViewState,
    observers: Vec<Observer>,
}

impl ViewController {
    pub fn new(catalog: VariableCatalog) -> Self {
        let state = ViewState::initial(&catalog);
        Self { catalog, state, observers: Vec::new() }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn catalog(&self) -> &VariableCatalog {
        &self.catalog
    }

    /// Register an observer. It is not called until the next transition;
    /// use [`ViewController::refresh`] for an initial render.
    pub fn subscribe(&mut self, observer: impl FnMut(&ViewState) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Show `key` in univariate mode, leaving bivariate mode if needed.
    ///
    /// Fails without touching the state when `key` is not in the catalog.
    pub fn select_variable(&mut self, key: &str) -> Result<()> {
        if self.catalog.get(key).is_none() {
            return Err(AtlasError::UnknownVariable(key.to_string()));
        }
        self.state.variable = key.to_string();
        self.state.mode = Mode::Univariate;
        debug!(variable = key, "select variable");
        self.notify();
        Ok(())
    }

    /// Switch to the intensity × frequency map.
    pub fn select_bivariate(&mut self) {
        self.state.mode = Mode::Bivariate;
        debug!("select bivariate");
        self.notify();
    }

    /// Back to univariate on the last selected variable.
    pub fn select_univariate(&mut self) {
        self.state.mode = Mode::Univariate;
        debug!(variable = %self.state.variable, "select univariate");
        self.notify();
    }

    /// Re-run every observer on the current state.
    pub fn refresh(&mut self) {
        self.notify();
    }

    fn notify(&mut self) {
        let state = &self.state;
        for observer in &mut self.observers {
            observer(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(ctl: &mut ViewController) -> Rc<RefCell<Vec<ViewState>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        ctl.subscribe(move |s| sink.borrow_mut().push(s.clone()));
        seen
    }

    #[test]
    fn starts_univariate_on_first_variable() {
        let ctl = ViewController::new(VariableCatalog::drias());
        assert_eq!(ctl.state().variable, "drias_Cumu");
        assert_eq!(ctl.state().mode, Mode::Univariate);
    }

    #[test]
    fn selecting_a_variable_leaves_bivariate_mode() {
        let mut ctl = ViewController::new(VariableCatalog::drias());
        ctl.select_bivariate();
        assert!(ctl.state().is_bivariate());
        ctl.select_variable("drias_Cu_3").unwrap();
        assert_eq!(ctl.state().mode, Mode::Univariate);
        assert_eq!(ctl.state().variable, "drias_Cu_3");
    }

    #[test]
    fn univariate_toggle_restores_previous_variable() {
        let mut ctl = ViewController::new(VariableCatalog::drias());
        ctl.select_variable("drias_Inte").unwrap();
        ctl.select_bivariate();
        ctl.select_univariate();
        assert_eq!(ctl.state().variable, "drias_Inte");
        assert_eq!(ctl.state().mode, Mode::Univariate);
    }

    #[test]
    fn unknown_variable_is_rejected_without_side_effects() {
        let mut ctl = ViewController::new(VariableCatalog::drias());
        let seen = recorder(&mut ctl);
        ctl.select_bivariate();
        let err = ctl.select_variable("drias_nope").unwrap_err();
        assert!(matches!(err, AtlasError::UnknownVariable(k) if k == "drias_nope"));
        assert!(ctl.state().is_bivariate());
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn reselecting_same_state_still_notifies() {
        let mut ctl = ViewController::new(VariableCatalog::drias());
        let seen = recorder(&mut ctl);
        ctl.select_variable("drias_Cumu").unwrap();
        ctl.select_variable("drias_Cumu").unwrap();
        ctl.select_bivariate();
        ctl.select_bivariate();
        let seen = seen.borrow();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0], seen[1]);
        assert_eq!(seen[2], seen[3]);
    }

    #[test]
    fn every_observer_sees_the_new_snapshot() {
        let mut ctl = ViewController::new(VariableCatalog::drias());
        let a = recorder(&mut ctl);
        let b = recorder(&mut ctl);
        ctl.select_variable("drias_Fré").unwrap();
        assert_eq!(a.borrow()[0].variable, "drias_Fré");
        assert_eq!(*a.borrow(), *b.borrow());
    }
}
