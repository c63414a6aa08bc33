use std::io::{Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor, execute, queue,
    style::{self, Color, StyledContent, Stylize},
    terminal::{self, ClearType},
};

use mazerace::maze::wall_glyph;
use mazerace::{Cell, Generator, Maze, MazeConfig, Playback, Solver};

/// Delay between frames when replaying a tape.
const REPLAY_FRAME: Duration = Duration::from_millis(10);

fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::never("logs", "mazerace.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    guard
}

fn read_line(input: &mut String) -> std::io::Result<&str> {
    input.clear();
    std::io::stdin().read_line(input)?;
    Ok(input.trim())
}

/// Lists `options` and returns the one picked by its 1-based number or its name.
fn select<T: Copy + std::fmt::Display + std::str::FromStr>(
    input: &mut String,
    prompt: &str,
    options: &[T],
) -> std::io::Result<Option<T>> {
    println!("{prompt}");
    for (i, option) in options.iter().enumerate() {
        println!("{}. {}", i + 1, option);
    }
    let answer = read_line(input)?;
    let picked = match answer.parse::<usize>() {
        Ok(n) => n.checked_sub(1).and_then(|i| options.get(i)).copied(),
        Err(_) => answer.parse::<T>().ok(),
    };
    Ok(picked)
}

fn styled(cell: Cell) -> StyledContent<String> {
    let styled_symbol = if cell.is_wall() {
        wall_glyph(cell).to_string().with(Color::White)
    } else if cell.is_start() {
        "S".to_string().with(Color::Green).bold()
    } else if cell.is_finish() {
        "F".to_string().with(Color::Red).bold()
    } else if cell.paint() != 0 {
        let rgb = cell.paint();
        "●".to_string().with(Color::Rgb {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        })
    } else if cell.is_reached() || cell.is_walk() {
        "·".to_string().with(Color::DarkGrey)
    } else {
        " ".to_string().with(Color::Reset)
    };

    #[cfg(debug_assertions)]
    {
        use unicode_width::UnicodeWidthStr;
        assert_eq!(
            styled_symbol.content().width(),
            1,
            "Each cell must occupy exactly one character width."
        );
    }
    styled_symbol
}

fn render(stdout: &mut Stdout, maze: &Maze) -> std::io::Result<()> {
    let grid = maze.grid();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let cell = grid.get(mazerace::Point::new(row, col));
            queue!(stdout, style::PrintStyledContent(styled(cell)))?;
        }
        queue!(stdout, style::Print("\n"))?;
    }
    stdout.flush()
}

/// Rewinds both tapes and plays them forward, build first.
fn replay(stdout: &mut Stdout, maze: &mut Maze) -> std::io::Result<()> {
    while maze.step_backward(Playback::Solve) {}
    while maze.step_backward(Playback::Build) {}
    for playback in [Playback::Build, Playback::Solve] {
        while maze.step_forward(playback) {
            execute!(stdout, cursor::MoveTo(0, 0))?;
            render(stdout, maze)?;
            std::thread::sleep(REPLAY_FRAME);
        }
    }
    Ok(())
}

fn main() -> std::io::Result<()> {
    let _guard = init_logging();
    let mut stdout = std::io::stdout();
    let mut input = String::new();
    let mut config = MazeConfig::default();

    println!(
        "Enter maze dimensions (rows cols), optionally followed by a seed [default {} {}]:",
        config.rows, config.cols
    );
    let fields = read_line(&mut input)?
        .split_whitespace()
        .map(|s| s.parse::<u64>())
        .collect::<Result<Vec<_>, _>>();
    match fields.as_deref() {
        Ok([]) => {}
        Ok([rows, cols, rest @ ..]) if *rows >= 3 && *cols >= 3 && rest.len() <= 1 => {
            config.rows = *rows as usize;
            config.cols = *cols as usize;
            config.seed = rest.first().copied();
        }
        _ => {
            eprintln!("Please enter two numbers of at least 3, and an optional seed.");
            return Ok(());
        }
    }

    let Some(generator) = select(&mut input, "Select maze generation algorithm:", &Generator::ALL)? else {
        eprintln!("Invalid selection.");
        return Ok(());
    };
    config.generator = generator;
    let Some(solver) = select(&mut input, "Select maze solving algorithm:", &Solver::ALL)? else {
        eprintln!("Invalid selection.");
        return Ok(());
    };
    config.solver = solver;
    tracing::info!("[main] running with {:?}", config);

    let mut rng = config.rng();
    let outcome = Maze::new(config.rows, config.cols).and_then(|mut maze| {
        maze.generate(config.generator, &mut rng)?;
        let outcome = maze.solve(config.solver, &mut rng)?;
        Ok((maze, outcome))
    });
    let (mut maze, outcome) = match outcome {
        Ok(done) => done,
        Err(err) => {
            eprintln!("Maze failed: {err}");
            return Ok(());
        }
    };

    execute!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    render(&mut stdout, &maze)?;
    match outcome.winner {
        Some(winner) if config.solver.workers() > 1 => println!(
            "Worker {} of {} won: {} cells from {} to {}.",
            winner,
            config.solver.workers(),
            outcome.path.len(),
            outcome.start,
            outcome.finish
        ),
        Some(_) => println!("Maze solved! {} cells from start to finish.", outcome.path.len()),
        None => println!("No path found to the finish."),
    }

    println!("Replay the build and solve history? (y/N)");
    if read_line(&mut input)?.eq_ignore_ascii_case("y") {
        execute!(stdout, terminal::Clear(ClearType::All))?;
        replay(&mut stdout, &mut maze)?;
    }
    Ok(())
}
