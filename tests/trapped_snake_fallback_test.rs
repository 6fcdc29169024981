// Integration test for trapped snake fallback behavior
//
// When our snake has NO legal moves, the bot still answers, with the
// configured fallback direction, rather than failing the request.

use bitfield_snake::bot::Bot;
use bitfield_snake::config::{Config, SearchConfig, Selection};
use bitfield_snake::types::{Battlesnake, Board, Coord, Direction, Game};

fn snake(id: &str, body: &[(i32, i32)]) -> Battlesnake {
    Battlesnake {
        id: id.to_string(),
        name: id.to_string(),
        health: 50,
        body: body.iter().map(|&(x, y)| Coord { x, y }).collect(),
        shout: None,
    }
}

fn game() -> Game {
    Game {
        id: "test-game".to_string(),
        ..Game::default()
    }
}

/// Test: Snake in the top-left corner with its own body below and beside it
#[tokio::test]
async fn test_boxed_in_by_walls_and_body_sends_up() {
    let bot = Bot::new(Config::default_hardcoded());

    let you = snake("our-snake", &[(0, 0), (1, 0), (1, 1), (0, 1), (0, 2)]);
    let board = Board {
        height: 11,
        width: 11,
        food: vec![],
        snakes: vec![you.clone()],
        hazards: vec![],
    };

    let response = bot.get_move(&game(), &0, &board, &you).await.unwrap();
    assert_eq!(response["move"], "up");
}

/// Test: Snake in open space but surrounded on all four sides by opponents
#[tokio::test]
async fn test_boxed_in_by_opponents_sends_up() {
    let bot = Bot::new(Config::default_hardcoded());

    let you = snake("our-snake", &[(5, 5), (5, 6), (5, 7)]);
    let board = Board {
        height: 11,
        width: 11,
        food: vec![],
        snakes: vec![
            you.clone(),
            snake("north", &[(5, 4), (4, 4), (3, 4)]),
            snake("west", &[(4, 5), (4, 6), (3, 6)]),
            snake("east", &[(6, 5), (6, 6), (6, 7), (6, 8)]),
        ],
        hazards: vec![],
    };

    // our tail at (5, 7) frees up, but it is not next to the head, and the
    // neck at (5, 6) blocks down
    let response = bot.get_move(&game(), &3, &board, &you).await.unwrap();
    assert_eq!(response["move"], "up");
}

/// Test: The fallback comes from configuration
#[test]
fn test_fallback_move_is_configurable() {
    let you = snake("our-snake", &[(0, 0), (1, 0), (1, 1), (0, 1), (0, 2)]);
    let board = Board {
        height: 11,
        width: 11,
        food: vec![],
        snakes: vec![you.clone()],
        hazards: vec![],
    };
    let search = SearchConfig {
        max_depth: 3,
        selection: Selection::LowestScore,
        fallback_move: Direction::Right,
    };

    assert_eq!(Bot::select_move(&board, &you, &search), Ok(Direction::Right));
}
