pub mod compare;
pub mod run;
pub mod sweep;

use std::error::Error;
use std::path::Path;

use battle_mdp::Scenario;

pub type CmdResult<T = ()> = Result<T, Box<dyn Error + Send + Sync>>;

/// The scenario at `path`, or the built-in reference setup.
pub fn load_scenario(path: Option<&Path>) -> Result<Scenario, battle_mdp::ScenarioError> {
    match path {
        Some(path) => Scenario::load(path),
        None => Ok(Scenario::reference()),
    }
}
