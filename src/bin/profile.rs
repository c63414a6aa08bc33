use std::time::{Duration, Instant};

use mazerace::{Generator, Maze, Solver, config::get_rng};

fn main() -> Result<(), mazerace::MazeError> {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(20);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok());

    let mut rng = get_rng(seed);
    let mut maze = Maze::new(255, 255)?;
    for generator in Generator::ALL {
        for solver in Solver::ALL {
            let mut build_time = Duration::ZERO;
            let mut solve_time = Duration::ZERO;
            for _ in 0..num_iters {
                let started = Instant::now();
                maze.generate(generator, &mut rng)?;
                build_time += started.elapsed();

                let started = Instant::now();
                maze.solve(solver, &mut rng)?;
                solve_time += started.elapsed();
            }
            println!(
                "{:<24} {:<10} build {:>10.2?} solve {:>10.2?} ({} deltas recorded)",
                generator.name(),
                solver.name(),
                build_time / num_iters.max(1) as u32,
                solve_time / num_iters.max(1) as u32,
                maze.build_tape().len() + maze.solve_tape().len(),
            );
        }
    }
    Ok(())
}
