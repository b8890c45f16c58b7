use crate::options::Options;
use crate::utils::luby;

#[derive(Debug)]
pub struct RestartStrategy {
    pub is_luby: bool,
    pub restart_init: usize,
    pub restart_inc: f64,
}

impl RestartStrategy {
    pub fn from_options(options: &Options) -> Self {
        Self {
            is_luby: options.is_luby,
            restart_init: options.restart_init,
            restart_inc: options.restart_inc,
        }
    }

    /// Number of conflicts allowed before the next restart.
    pub fn num_confl(&self, restarts: usize) -> usize {
        let restart_base = if self.is_luby {
            luby(self.restart_inc, restarts as u32)
        } else {
            self.restart_inc.powi(restarts as i32)
        };

        (restart_base * self.restart_init as f64) as usize
    }
}
