use crate::battle::state::{BattleMode, BattleState};
use crate::errors::{ActionError, BattleResult, BattleStateError};
use schema::Item;

/// Check if catch attempts are allowed based on battle mode
pub fn is_catch_allowed(mode: BattleMode) -> bool {
    matches!(mode, BattleMode::Wild)
}

/// Validate a ball throw and return the ball's capture modifier.
pub fn validate_catch_attempt(state: &BattleState, ball: Item) -> BattleResult<f32> {
    if !is_catch_allowed(state.mode) {
        return Err(ActionError::CatchNotAllowed.into());
    }

    let modifier = ball.ball_modifier().ok_or(ActionError::NotABall(ball))?;

    if state.opponent.active().pokemon.is_fainted() {
        return Err(BattleStateError::NoOpponent.into());
    }

    Ok(modifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{create_test_battle, TestPokemonBuilder};
    use crate::errors::BattleEngineError;
    use crate::prefab_data::{PIDGEY, PIKACHU};

    #[test]
    fn test_ball_modifier_is_returned() {
        let state = create_test_battle(
            TestPokemonBuilder::new(PIKACHU, 10).build(),
            TestPokemonBuilder::new(PIDGEY, 5).build(),
        );
        assert_eq!(validate_catch_attempt(&state, Item::GreatBall), Ok(1.5));
    }

    #[test]
    fn test_trainer_battles_reject_catching() {
        let mut state = create_test_battle(
            TestPokemonBuilder::new(PIKACHU, 10).build(),
            TestPokemonBuilder::new(PIDGEY, 5).build(),
        );
        state.mode = BattleMode::Trainer;
        assert_eq!(
            validate_catch_attempt(&state, Item::PokeBall),
            Err(BattleEngineError::Action(ActionError::CatchNotAllowed))
        );
    }

    #[test]
    fn test_only_balls_can_be_thrown() {
        let state = create_test_battle(
            TestPokemonBuilder::new(PIKACHU, 10).build(),
            TestPokemonBuilder::new(PIDGEY, 5).build(),
        );
        assert_eq!(
            validate_catch_attempt(&state, Item::Potion),
            Err(BattleEngineError::Action(ActionError::NotABall(Item::Potion)))
        );
    }
}
