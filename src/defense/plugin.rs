use bevy::prelude::*;
use std::sync::{Arc, RwLock};

use crate::config::DefenseConfig;
use crate::defense::DefenseController;
use crate::logging::LoggingPlugin;

#[derive(Default)]
pub struct DefensePlugin {
    pub config: DefenseConfig,
}

impl Plugin for DefensePlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<LoggingPlugin>() {
            app.add_plugins(LoggingPlugin {
                config: self.config.logging.clone(),
            });
        }

        let controller = DefenseController::new(self.config.clone());

        app.insert_resource(DefenseResource(Arc::new(RwLock::new(controller))))
            .add_systems(Update, defense_tick_system);
    }
}

#[derive(Resource)]
pub struct DefenseResource(pub Arc<RwLock<DefenseController>>);

fn defense_tick_system(time: Res<Time>, defense_res: Res<DefenseResource>) {
    if let Ok(mut defense) = defense_res.0.write() {
        defense.update(time.delta_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_plugin_ticks_controller() {
        let mut config = DefenseConfig::default();
        config.waves.spawn_interval = 0.5;

        let mut app = App::new();
        app.insert_resource(Time::<()>::default())
            .add_plugins(DefensePlugin { config });

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(600));
        app.update();

        let res = app.world().resource::<DefenseResource>();
        let defense = res.0.read().unwrap();
        assert_eq!(defense.waves().spawned(), 1);
    }

    #[test]
    fn test_plugin_installs_logging_once() {
        let mut app = App::new();
        app.add_plugins(LoggingPlugin::default())
            .add_plugins(DefensePlugin::default());
        assert!(app.is_plugin_added::<LoggingPlugin>());
        assert!(app.world().contains_resource::<DefenseResource>());
    }
}
