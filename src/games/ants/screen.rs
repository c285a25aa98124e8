use crate::error::GameError;
use crate::events::gamestate::Transition;
use crate::game::{GameState, Tick};
use crate::games::ants::AntsScreen;
use crate::games::ants::nest::Nest;
use crate::resources::surface::Surface;

/// The only ants screen: the colony running on its own. Escape quits.
pub struct ColonyScreen {
    nest: Nest,
}

impl ColonyScreen {
    pub fn new(nest: Nest) -> Self {
        Self { nest }
    }

    pub fn nest_mut(&mut self) -> &mut Nest {
        &mut self.nest
    }
}

impl GameState<AntsScreen> for ColonyScreen {
    fn update(&mut self, tick: &mut Tick<'_>) -> Result<Option<Transition<AntsScreen>>, GameError> {
        if tick.input.action_back.just_pressed {
            return Ok(Some(Transition::Quit));
        }
        self.nest.process(tick.elapsed_ms)?;
        Ok(None)
    }

    fn draw(&mut self, surface: &mut Surface) {
        self.nest.render(surface);
    }
}
