mod direction;
mod grid;
mod snake;
mod ticker;
pub(crate) use self::direction::Direction;
pub(crate) use self::grid::Grid;
pub(crate) use self::snake::Snake;
use self::ticker::Ticker;
use crate::config::GameConfig;
use crate::consts;
use crate::render::FrameState;
use crate::store::Persistence;
use rand::Rng;
use ratatui::layout::Position;
use std::fmt;
use std::time::Duration;

/// The display outputs driven by a [`Game`]
pub(crate) trait View {
    /// Show a new frame of the board
    fn render(&mut self, frame: FrameState);

    fn update_scores(&mut self, score: u32, high_score: u32);

    fn set_status(&mut self, state: GameState);

    /// Show the game-over overlay with the final score
    fn show_game_over(&mut self, final_score: u32);

    fn hide_game_over(&mut self);
}

/// The snake engine.
///
/// The game advances one cell per call to [`Game::tick()`]; a real-time
/// front end feeds it wall-clock time through [`Game::advance_time()`]
/// instead.  Everything the game shows goes through the `View`, and the high
/// score is kept in the `Persistence` store.
#[derive(Clone, Debug)]
pub(crate) struct Game<P, V, R = rand::rngs::ThreadRng> {
    rng: R,
    store: P,
    view: V,
    grid: Grid,
    snake: Snake,
    /// The direction applied by the most recent tick; `None` until the snake
    /// first moves
    heading: Option<Direction>,
    /// The direction to apply on the next tick
    pending: Option<Direction>,
    food: Option<Position>,
    score: u32,
    high_score: u32,
    state: GameState,
    ticker: Ticker,
}

impl<P: Persistence, V: View> Game<P, V, rand::rngs::ThreadRng> {
    pub(crate) fn new(config: GameConfig, store: P, view: V) -> Self {
        Game::new_with_rng(config, store, view, rand::rng())
    }
}

impl<P: Persistence, V: View, R: Rng> Game<P, V, R> {
    pub(crate) fn new_with_rng(config: GameConfig, store: P, view: V, rng: R) -> Game<P, V, R> {
        let high_score = load_high_score(&store);
        let grid = config.grid;
        let mut game = Game {
            rng,
            store,
            view,
            grid,
            snake: Snake::centered(grid),
            heading: None,
            pending: None,
            food: None,
            score: 0,
            high_score,
            state: GameState::Idle,
            ticker: Ticker::new(config.tick_period),
        };
        game.initialize();
        game
    }

    /// Put a fresh snake in the middle of the board, waiting for the first
    /// move
    pub(crate) fn initialize(&mut self) {
        self.ticker.cancel();
        self.snake = Snake::centered(self.grid);
        self.heading = None;
        self.pending = None;
        self.score = 0;
        self.state = GameState::Idle;
        self.spawn_food();
        self.render();
        self.view.set_status(self.state);
    }

    /// Handle a request from the player to change direction
    pub(crate) fn submit_direction(&mut self, requested: Direction) {
        match self.state {
            GameState::Over => (),
            GameState::Idle => {
                // The starting layout implies the snake is facing right.
                if requested == Direction::Left {
                    return;
                }
                self.pending = Some(requested);
                self.state = GameState::Running;
                self.ticker.start();
                log::info!("Game started heading {requested:?}");
                self.view.set_status(self.state);
            }
            GameState::Running => {
                if self.snake.len() > 1 && self.heading.map(Direction::reverse) == Some(requested) {
                    log::debug!("Ignoring reversal to {requested:?}");
                    return;
                }
                self.pending = Some(requested);
            }
        }
    }

    /// Move the snake one cell.  Does nothing unless the game is running.
    pub(crate) fn tick(&mut self) {
        if self.state != GameState::Running {
            return;
        }
        self.heading = self.pending;
        let Some(direction) = self.heading else {
            return;
        };
        let Some(new_head) = direction.advance(self.snake.head(), self.grid) else {
            self.end_game();
            return;
        };
        // This deliberately includes the tail cell, even though the tail is
        // about to move out of the way.
        if self.snake.contains(new_head) {
            self.end_game();
            return;
        }
        self.snake.push_head(new_head);
        if Some(new_head) == self.food {
            self.score += consts::FOOD_REWARD;
            self.spawn_food();
        } else {
            self.snake.pop_tail();
        }
        self.render();
    }

    /// Let `elapsed` of simulation time pass, ticking once for each tick
    /// period that falls due
    pub(crate) fn advance_time(&mut self, elapsed: Duration) {
        for _ in 0..self.ticker.advance(elapsed) {
            if !self.ticker.is_active() {
                break;
            }
            self.tick();
        }
    }

    /// Time until the next tick is due, or `None` if the snake isn't moving
    pub(crate) fn until_next_tick(&self) -> Option<Duration> {
        self.ticker.until_next()
    }

    /// Throw away the finished game and set up a new one
    pub(crate) fn restart(&mut self) {
        self.ticker.cancel();
        self.view.hide_game_over();
        self.initialize();
    }

    fn end_game(&mut self) {
        self.ticker.cancel();
        self.state = GameState::Over;
        log::info!("Game over with score {}", self.score);
        if self.score > self.high_score {
            self.high_score = self.score;
            log::info!("New high score: {}", self.high_score);
            if let Err(e) = self
                .store
                .set(consts::HIGH_SCORE_KEY, &self.high_score.to_string())
            {
                log::warn!("Could not save high score: {:#}", anyhow::Error::new(e));
            }
        }
        self.view.update_scores(self.score, self.high_score);
        self.view.set_status(self.state);
        self.view.show_game_over(self.score);
    }

    /// Place the food on a random cell not occupied by the snake.  If the
    /// snake fills the grid, there is nowhere to put it.
    fn spawn_food(&mut self) {
        if self.snake.len() >= self.grid.area() {
            self.food = None;
            return;
        }
        let size = self.grid.size();
        self.food = loop {
            let candidate = Position::new(
                self.rng.random_range(0..size),
                self.rng.random_range(0..size),
            );
            if !self.snake.contains(candidate) {
                break Some(candidate);
            }
        };
    }

    fn render(&mut self) {
        let frame = FrameState {
            grid_size: self.grid.size(),
            cell_size: self.grid.cell_size(),
            snake: self.snake.iter().collect(),
            food: self.food,
        };
        self.view.render(frame);
        self.view.update_scores(self.score, self.high_score);
    }
}

impl<P, V, R> Game<P, V, R> {
    pub(crate) fn state(&self) -> GameState {
        self.state
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn high_score(&self) -> u32 {
        self.high_score
    }

    pub(crate) fn snake(&self) -> &Snake {
        &self.snake
    }

    pub(crate) fn food(&self) -> Option<Position> {
        self.food
    }

    pub(crate) fn view(&self) -> &V {
        &self.view
    }

    pub(crate) fn persistence_mut(&mut self) -> &mut P {
        &mut self.store
    }
}

fn load_high_score<P: Persistence>(store: &P) -> u32 {
    match store.get(consts::HIGH_SCORE_KEY).map(str::parse::<u32>) {
        Some(Ok(score)) => score,
        Some(Err(e)) => {
            log::warn!("Ignoring unparsable saved high score: {e}");
            0
        }
        None => 0,
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum GameState {
    /// Waiting for the first move
    Idle,
    Running,
    Over,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameState::Idle => write!(f, "Press an arrow key to start"),
            GameState::Running => write!(f, "Game Running..."),
            GameState::Over => write!(f, "Game Over! Press Enter to restart"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileStore, SaveError};
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use rstest::rstest;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    /// A `View` that keeps the most recent value of every output
    #[derive(Clone, Debug, Default, Eq, PartialEq)]
    struct Spy {
        frames: usize,
        last_frame: Option<FrameState>,
        scores: Option<(u32, u32)>,
        status: Option<GameState>,
        game_over: Option<u32>,
    }

    impl View for Spy {
        fn render(&mut self, frame: FrameState) {
            self.frames += 1;
            self.last_frame = Some(frame);
        }

        fn update_scores(&mut self, score: u32, high_score: u32) {
            self.scores = Some((score, high_score));
        }

        fn set_status(&mut self, state: GameState) {
            self.status = Some(state);
        }

        fn show_game_over(&mut self, final_score: u32) {
            self.game_over = Some(final_score);
        }

        fn hide_game_over(&mut self) {
            self.game_over = None;
        }
    }

    /// A store that counts its writes and can be told to fail them
    #[derive(Clone, Debug, Default)]
    struct CountingStore {
        inner: FileStore,
        writes: usize,
        broken: bool,
    }

    impl Persistence for CountingStore {
        fn get(&self, key: &str) -> Option<&str> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
            self.writes += 1;
            if self.broken {
                let tmpdir = tempfile::tempdir().unwrap();
                let path = tmpdir.path().join("store.json");
                fs_err::create_dir(&path).unwrap();
                FileStore::with_path(path).set(key, value)
            } else {
                self.inner.set(key, value)
            }
        }
    }

    type TestGame = Game<CountingStore, Spy, ChaCha12Rng>;

    fn new_game() -> TestGame {
        new_game_with_store(CountingStore::default())
    }

    fn new_game_with_store(store: CountingStore) -> TestGame {
        Game::new_with_rng(
            GameConfig::default(),
            store,
            Spy::default(),
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        )
    }

    fn cells(game: &TestGame) -> Vec<Position> {
        game.snake().iter().collect()
    }

    /// Replace the snake and food of a running game
    fn arrange(game: &mut TestGame, snake: &[Position], heading: Direction, food: Position) {
        game.snake = Snake::from_cells(snake.iter().copied());
        game.heading = Some(heading);
        game.pending = Some(heading);
        game.food = Some(food);
        game.state = GameState::Running;
        game.ticker.start();
    }

    #[test]
    fn initial_state() {
        let game = new_game();
        assert_eq!(game.state(), GameState::Idle);
        assert_eq!(game.score(), 0);
        assert_eq!(game.high_score(), 0);
        assert_eq!(
            cells(&game),
            [
                Position::new(15, 15),
                Position::new(14, 15),
                Position::new(13, 15)
            ]
        );
        assert_eq!(game.until_next_tick(), None);
        let food = game.food().unwrap();
        assert!(!game.snake().contains(food));
        assert!(Grid::default().contains(food));
        let view = game.view();
        assert_eq!(view.frames, 1);
        assert_eq!(view.scores, Some((0, 0)));
        assert_eq!(view.status, Some(GameState::Idle));
        assert_eq!(
            view.last_frame.as_ref().map(|f| f.snake.clone()),
            Some(cells(&game))
        );
    }

    #[test]
    fn idle_game_does_not_tick() {
        let mut game = new_game();
        game.tick();
        game.advance_time(Duration::from_secs(10));
        assert_eq!(game.state(), GameState::Idle);
        assert_eq!(cells(&game)[0], Position::new(15, 15));
        assert_eq!(game.view().frames, 1);
    }

    #[test]
    fn start_moving_up() {
        let mut game = new_game();
        game.submit_direction(Direction::Up);
        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.view().status, Some(GameState::Running));
        assert_eq!(game.until_next_tick(), Some(consts::TICK_PERIOD));
        game.food = Some(Position::new(0, 0));
        game.tick();
        assert_eq!(
            cells(&game),
            [
                Position::new(15, 14),
                Position::new(15, 15),
                Position::new(14, 15)
            ]
        );
        assert_eq!(game.view().frames, 2);
    }

    #[rstest]
    #[case(Direction::Up, Position::new(15, 14))]
    #[case(Direction::Down, Position::new(15, 16))]
    #[case(Direction::Right, Position::new(16, 15))]
    fn start_in_any_direction_but_left(#[case] d: Direction, #[case] head: Position) {
        let mut game = new_game();
        game.food = Some(Position::new(0, 0));
        game.submit_direction(d);
        game.tick();
        assert_eq!(game.snake().head(), head);
        assert_eq!(game.snake().len(), 3);
    }

    #[test]
    fn cannot_start_left() {
        let mut game = new_game();
        game.submit_direction(Direction::Left);
        assert_eq!(game.state(), GameState::Idle);
        assert_eq!(game.until_next_tick(), None);
        game.tick();
        assert_eq!(cells(&game)[0], Position::new(15, 15));
    }

    #[test]
    fn reversal_is_ignored() {
        let mut game = new_game();
        game.food = Some(Position::new(0, 0));
        game.submit_direction(Direction::Right);
        game.tick();
        game.submit_direction(Direction::Left);
        game.tick();
        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.snake().head(), Position::new(17, 15));
        assert_eq!(game.heading, Some(Direction::Right));
    }

    #[test]
    fn reversal_is_checked_against_applied_direction() {
        // Heading Right, Up is buffered and then Left arrives before the
        // next tick: Left still reverses the applied direction, so Up stays.
        let mut game = new_game();
        game.food = Some(Position::new(0, 0));
        game.submit_direction(Direction::Right);
        game.tick();
        game.submit_direction(Direction::Up);
        game.submit_direction(Direction::Left);
        game.tick();
        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.snake().head(), Position::new(16, 14));
    }

    #[test]
    fn latest_input_wins() {
        let mut game = new_game();
        game.food = Some(Position::new(0, 0));
        game.submit_direction(Direction::Right);
        game.tick();
        game.submit_direction(Direction::Up);
        game.submit_direction(Direction::Down);
        game.tick();
        assert_eq!(game.snake().head(), Position::new(16, 16));
    }

    #[test]
    fn single_cell_snake_may_reverse() {
        let mut game = new_game();
        arrange(
            &mut game,
            &[Position::new(5, 5)],
            Direction::Right,
            Position::new(0, 0),
        );
        game.submit_direction(Direction::Left);
        game.tick();
        assert_eq!(game.state(), GameState::Running);
        assert_eq!(cells(&game), [Position::new(4, 5)]);
    }

    #[test]
    fn eat_food() {
        let mut game = new_game();
        game.submit_direction(Direction::Right);
        game.food = Some(Position::new(16, 15));
        game.tick();
        assert_eq!(game.score(), 10);
        assert_eq!(
            cells(&game),
            [
                Position::new(16, 15),
                Position::new(15, 15),
                Position::new(14, 15),
                Position::new(13, 15)
            ]
        );
        let food = game.food().unwrap();
        assert!(!game.snake().contains(food));
        assert_eq!(game.view().scores, Some((10, 0)));
        game.food = Some(Position::new(0, 0));
        game.tick();
        assert_eq!(game.score(), 10);
        assert_eq!(game.snake().len(), 4);
    }

    #[test]
    fn wall_collision() {
        let mut game = new_game();
        let snake = [Position::new(0, 3), Position::new(1, 3), Position::new(2, 3)];
        arrange(&mut game, &snake, Direction::Left, Position::new(9, 9));
        game.score = 30;
        game.tick();
        assert_eq!(game.state(), GameState::Over);
        assert_eq!(cells(&game), snake);
        assert_eq!(game.until_next_tick(), None);
        let view = game.view();
        assert_eq!(view.game_over, Some(30));
        assert_eq!(view.status, Some(GameState::Over));
        assert_eq!(view.scores, Some((30, 30)));
    }

    #[rstest]
    #[case(Direction::Up, Position::new(4, 0))]
    #[case(Direction::Down, Position::new(4, 29))]
    #[case(Direction::Right, Position::new(29, 4))]
    fn collide_with_each_wall(#[case] d: Direction, #[case] head: Position) {
        let mut game = new_game();
        arrange(&mut game, &[head], d, Position::new(9, 9));
        game.tick();
        assert_eq!(game.state(), GameState::Over);
        assert_eq!(cells(&game), [head]);
    }

    #[test]
    fn self_collision() {
        let mut game = new_game();
        // A hook: moving Down from (5, 5) runs into (5, 6).
        let snake = [
            Position::new(5, 5),
            Position::new(6, 5),
            Position::new(6, 6),
            Position::new(5, 6),
            Position::new(4, 6),
        ];
        arrange(&mut game, &snake, Direction::Left, Position::new(9, 9));
        game.submit_direction(Direction::Down);
        game.tick();
        assert_eq!(game.state(), GameState::Over);
        assert_eq!(cells(&game), snake);
    }

    #[test]
    fn chasing_the_tail_is_a_collision() {
        let mut game = new_game();
        // A 2x2 loop: the head's next cell is the current tail.
        let snake = [
            Position::new(5, 5),
            Position::new(6, 5),
            Position::new(6, 6),
            Position::new(5, 6),
        ];
        arrange(&mut game, &snake, Direction::Left, Position::new(9, 9));
        game.submit_direction(Direction::Down);
        game.tick();
        assert_eq!(game.state(), GameState::Over);
    }

    #[test]
    fn input_ignored_after_game_over() {
        let mut game = new_game();
        arrange(
            &mut game,
            &[Position::new(0, 3)],
            Direction::Left,
            Position::new(9, 9),
        );
        game.tick();
        game.submit_direction(Direction::Up);
        assert_eq!(game.state(), GameState::Over);
        assert_eq!(game.until_next_tick(), None);
        game.tick();
        assert_eq!(cells(&game), [Position::new(0, 3)]);
    }

    #[test]
    fn high_score_saved_once() {
        let mut game = new_game();
        arrange(
            &mut game,
            &[Position::new(0, 3)],
            Direction::Left,
            Position::new(9, 9),
        );
        game.score = 50;
        game.tick();
        assert_eq!(game.high_score(), 50);
        assert_eq!(game.store.writes, 1);
        assert_eq!(game.store.get(consts::HIGH_SCORE_KEY), Some("50"));
    }

    #[rstest]
    #[case(40)]
    #[case(50)]
    fn high_score_not_beaten(#[case] score: u32) {
        let mut store = CountingStore::default();
        store.inner.set(consts::HIGH_SCORE_KEY, "50").unwrap();
        let mut game = new_game_with_store(store);
        assert_eq!(game.high_score(), 50);
        arrange(
            &mut game,
            &[Position::new(0, 3)],
            Direction::Left,
            Position::new(9, 9),
        );
        game.score = score;
        game.tick();
        assert_eq!(game.state(), GameState::Over);
        assert_eq!(game.high_score(), 50);
        assert_eq!(game.store.writes, 0);
    }

    #[test]
    fn unparsable_high_score() {
        let mut store = CountingStore::default();
        store.inner.set(consts::HIGH_SCORE_KEY, "lots").unwrap();
        let game = new_game_with_store(store);
        assert_eq!(game.high_score(), 0);
    }

    #[test]
    fn broken_store_is_not_fatal() {
        let store = CountingStore {
            broken: true,
            ..CountingStore::default()
        };
        let mut game = new_game_with_store(store);
        arrange(
            &mut game,
            &[Position::new(0, 3)],
            Direction::Left,
            Position::new(9, 9),
        );
        game.score = 20;
        game.tick();
        assert_eq!(game.state(), GameState::Over);
        assert_eq!(game.high_score(), 20);
        assert_eq!(game.store.writes, 1);
        game.restart();
        assert_eq!(game.state(), GameState::Idle);
        assert_eq!(game.high_score(), 20);
    }

    #[test]
    fn restart_after_game_over() {
        let mut game = new_game();
        arrange(
            &mut game,
            &[Position::new(0, 3), Position::new(1, 3)],
            Direction::Left,
            Position::new(9, 9),
        );
        game.score = 70;
        game.tick();
        assert_eq!(game.view().game_over, Some(70));
        game.restart();
        assert_eq!(game.state(), GameState::Idle);
        assert_eq!(game.score(), 0);
        assert_eq!(game.high_score(), 70);
        assert_eq!(game.heading, None);
        assert_eq!(game.pending, None);
        assert_eq!(game.until_next_tick(), None);
        assert_eq!(
            cells(&game),
            [
                Position::new(15, 15),
                Position::new(14, 15),
                Position::new(13, 15)
            ]
        );
        let view = game.view();
        assert_eq!(view.game_over, None);
        assert_eq!(view.status, Some(GameState::Idle));
        assert_eq!(view.scores, Some((0, 70)));
    }

    #[test]
    fn restart_while_running_stops_ticking() {
        let mut game = new_game();
        game.submit_direction(Direction::Up);
        game.restart();
        assert_eq!(game.until_next_tick(), None);
        game.advance_time(Duration::from_secs(1));
        assert_eq!(game.snake().head(), Position::new(15, 15));
    }

    #[test]
    fn advance_time_drives_ticks() {
        let mut game = new_game();
        game.food = Some(Position::new(0, 0));
        game.submit_direction(Direction::Up);
        game.advance_time(Duration::from_millis(250));
        assert_eq!(game.snake().head(), Position::new(15, 13));
        assert_eq!(game.until_next_tick(), Some(Duration::from_millis(50)));
        game.advance_time(Duration::from_millis(50));
        assert_eq!(game.snake().head(), Position::new(15, 12));
    }

    #[test]
    fn advance_time_stops_at_game_over() {
        let mut game = new_game();
        game.food = Some(Position::new(0, 0));
        game.submit_direction(Direction::Up);
        // Far more time than the 15 ticks needed to reach the wall
        game.advance_time(Duration::from_secs(60));
        assert_eq!(game.state(), GameState::Over);
        assert_eq!(game.snake().head(), Position::new(15, 0));
        assert_eq!(game.snake().len(), 3);
    }

    #[test]
    fn snake_stays_on_board_and_off_food() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let grid = Grid::default();
        for _ in 0..20 {
            let mut game = new_game();
            game.submit_direction(Direction::Right);
            while game.state() == GameState::Running {
                let d = match rng.random_range(0..4) {
                    0 => Direction::Up,
                    1 => Direction::Down,
                    2 => Direction::Left,
                    _ => Direction::Right,
                };
                game.submit_direction(d);
                let before = game.snake().len();
                let score = game.score();
                let food = game.food();
                game.tick();
                assert!(game.snake().iter().all(|p| grid.contains(p)));
                if let Some(f) = game.food() {
                    assert!(!game.snake().contains(f));
                }
                if game.state() == GameState::Running {
                    if Some(game.snake().head()) == food {
                        assert_eq!(game.snake().len(), before + 1);
                        assert_eq!(game.score(), score + 10);
                    } else {
                        assert_eq!(game.snake().len(), before);
                        assert_eq!(game.score(), score);
                    }
                }
            }
        }
    }

    #[test]
    fn no_food_on_a_full_board() {
        let config = GameConfig {
            grid: Grid::from_canvas(4, 1).unwrap(),
            ..GameConfig::default()
        };
        let mut game = Game::new_with_rng(
            config,
            CountingStore::default(),
            Spy::default(),
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        );
        let everywhere = config.grid.positions().collect::<Vec<_>>();
        arrange(&mut game, &everywhere, Direction::Right, Position::new(0, 0));
        game.spawn_food();
        assert_eq!(game.food(), None);
    }
}
