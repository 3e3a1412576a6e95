// Drunk walk home: controls are inverted and the player sways while idle.
use bevy::prelude::*;

use crate::cards::{Card, Until};
use crate::director::{Cue, Flow};
use crate::npc::approach;
use crate::sections::overlaps;

pub fn instructions() -> Card {
    Card::new(
        &["Get to the house!", "Arrow keys to move.", "", "Press ENTER to start"],
        Until::Enter,
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaggerGame {
    house: Rect,
    sway_timer: u32,
    sway_direction: f32,
}

impl StaggerGame {
    pub fn new(house: Rect) -> Self {
        Self {
            house,
            sway_timer: 0,
            sway_direction: 1.0,
        }
    }

    pub fn step(&mut self, cue: &mut Cue) -> Flow {
        let params = cue.profile.stagger;
        self.sway_timer += 1;
        if self.sway_timer > params.sway_period {
            self.sway_timer = 0;
            self.sway_direction = -self.sway_direction;
        }
        let sway = self.sway_direction * params.sway_magnitude;

        let held = cue.controls.held;
        let player = &mut cue.stage.player;
        if held.up {
            player.y += params.speed;
            player.x -= sway;
        }
        if held.down {
            player.y -= params.speed;
            player.x += sway;
        }
        if held.left {
            player.x += params.speed;
        }
        if held.right {
            player.x -= params.speed;
        }
        if !held.any() {
            player.x += sway;
        }
        let leader = *player;
        approach(&mut cue.stage.companion, leader, params.speed, params.keep_distance);

        if overlaps(cue.stage.player_rect(cue.profile), self.house) {
            info!("made it to the house");
            Flow::Finished
        } else {
            Flow::Running
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;
    use crate::input::{Controls, Held};
    use crate::sections::Stage;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn step(game: &mut StaggerGame, stage: &mut Stage, held: Held) -> Flow {
        let profile = Profile::desktop();
        let controls = Controls::holding(held);
        let mut rng = StdRng::seed_from_u64(0);
        let mut cue = Cue {
            stage,
            controls: &controls,
            profile: &profile,
            rng: &mut rng,
            columns: 44,
        };
        game.step(&mut cue)
    }

    fn far_house() -> Rect {
        Rect::new(-1000.0, -1000.0, -900.0, -900.0)
    }

    #[test]
    fn arrows_are_inverted() {
        let mut stage = Stage::new(&Profile::desktop());
        stage.player = Vec2::new(400.0, 300.0);
        let mut game = StaggerGame::new(far_house());
        step(&mut game, &mut stage, Held { left: true, ..default() });
        assert_eq!(stage.player, Vec2::new(402.5, 300.0));
        step(&mut game, &mut stage, Held { down: true, ..default() });
        assert_eq!(stage.player, Vec2::new(403.0, 297.5));
    }

    #[test]
    fn idle_sway_flips_after_a_period() {
        let mut stage = Stage::new(&Profile::desktop());
        stage.player = Vec2::new(400.0, 300.0);
        let mut game = StaggerGame::new(far_house());
        for _ in 0..100 {
            step(&mut game, &mut stage, Held::default());
        }
        assert_eq!(stage.player.x, 450.0);
        step(&mut game, &mut stage, Held::default());
        assert_eq!(stage.player.x, 449.5);
    }

    #[test]
    fn companion_keeps_its_distance() {
        let mut stage = Stage::new(&Profile::desktop());
        stage.player = Vec2::new(400.0, 300.0);
        stage.companion = Vec2::new(100.0, 300.0);
        let mut game = StaggerGame::new(far_house());
        for _ in 0..400 {
            step(&mut game, &mut stage, Held::default());
        }
        let gap = stage.companion.distance(stage.player);
        assert!(gap <= 40.0 + 2.5 + 0.5);
    }

    #[test]
    fn reaching_the_house_ends_the_game() {
        let profile = Profile::desktop();
        let mut stage = Stage::new(&profile);
        stage.player = Vec2::new(300.0, 100.0);
        let house = Rect::new(100.0, 45.0, 300.0, 195.0);
        let mut game = StaggerGame::new(house);
        let mut flow = Flow::Running;
        for _ in 0..10 {
            flow = step(&mut game, &mut stage, Held { right: true, ..default() });
            if flow == Flow::Finished {
                break;
            }
        }
        assert_eq!(flow, Flow::Finished);
    }
}
