mod ai;
mod config;
mod confirm;
mod context;
mod executor;
mod history;
mod matcher;
mod merger;
mod patterns;
mod ranker;
mod risk;
mod types;
mod ui;

use std::{env, fs, process::Command};

fn print_usage() {
    eprintln!("usage: ai-run [-e] <command> [args...]");
    eprintln!("       ai-run config | doctor");
    eprintln!();
    eprintln!("runs the command; on failure, suggests up to 3 ranked fixes");
    eprintln!("  -e, --explain   show the analysis without prompting to run a fix");
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[0].as_str() {
        "config" => cmd_config(),
        "doctor" => cmd_doctor(),
        "-h" | "--help" | "help" => {
            print_usage();
            Ok(0)
        }
        _ => {
            let mut explain = false;
            let mut parts: Vec<String> = Vec::new();
            for arg in &args {
                match arg.as_str() {
                    // flags only count before the wrapped command starts
                    "-e" | "--explain" if parts.is_empty() => explain = true,
                    _ => parts.push(arg.clone()),
                }
            }
            if parts.is_empty() {
                print_usage();
                Ok(1)
            } else {
                run_wrapped(&parts.join(" "), explain)
            }
        }
    };

    // top boundary: anything that escaped the pipeline's degraded paths
    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("ai-run: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_wrapped(command: &str, explain: bool) -> Result<i32, Box<dyn std::error::Error>> {
    let config = config::load_config();
    let table = patterns::load_table(&config::get_patterns_path())?;

    let result = executor::run_shell(command)?;
    if result.exit_code == 0 {
        return Ok(0);
    }

    ui::print_thinking();
    let ctx = context::collect(command, &result, &config);
    let ai_rx = ai::spawn_analysis(&config, &ctx);
    let matches = matcher::match_failure(&ctx, &table);
    let ai_result = ai::wait_analysis(ai_rx);
    ui::clear_thinking();

    let ai_reasoning = ai_result
        .as_ref()
        .map(|a| a.reasoning.clone())
        .filter(|r| !r.is_empty());
    let analysis = merger::merge(matches, ai_result, config.ai.confidence_threshold);
    let fixes = ranker::rank(&analysis, config.behavior.max_fixes);

    ui::print_analysis(&analysis);
    if analysis.analysis_method != types::AnalysisMethod::Heuristic {
        if let Some(reasoning) = &ai_reasoning {
            ui::print_reasoning(reasoning);
        }
    }

    if explain {
        ui::print_fixes_detailed(&fixes);
        return Ok(result.exit_code);
    }

    let stdin = std::io::stdin();
    match confirm::decide(&fixes, &mut stdin.lock())? {
        confirm::Decision::ExecuteFix(index) => {
            let fix_result = executor::run_shell(&fixes[index].command)?;
            ui::print_fix_outcome(&fix_result);
            Ok(fix_result.exit_code)
        }
        // the original failure stands, and so does its exit code
        confirm::Decision::Reject => Ok(result.exit_code),
    }
}

fn cmd_config() -> Result<i32, Box<dyn std::error::Error>> {
    let path = config::get_config_path();
    if !path.exists() {
        config::save_config(&config::Config::default())?;
    }
    let editor = env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    Command::new(&editor).arg(&path).status()?;
    Ok(0)
}

fn cmd_doctor() -> Result<i32, Box<dyn std::error::Error>> {
    let config = config::load_config();

    let config_path = config::get_config_path();
    print!("config:   ");
    if config_path.exists() {
        println!("{}", config_path.display());
    } else {
        println!("defaults (no file at {})", config_path.display());
    }

    let patterns_path = config::get_patterns_path();
    let table = patterns::load_table(&patterns_path)?;
    let builtin = patterns::builtin_rules()?.len();
    print!("patterns: {} built-in", builtin);
    if table.rules.len() > builtin {
        print!(", {} user", table.rules.len() - builtin);
    }
    println!();

    print!("ai:       ");
    if !config.ai.enabled {
        println!("disabled");
    } else {
        match ai::AiClient::new(&config.ai) {
            Ok(client) if client.is_available() => {
                println!("ok ({}, {})", config.ai.endpoint, config.ai.model)
            }
            _ => println!("unreachable ({}); falling back to heuristics", config.ai.endpoint),
        }
    }

    if patterns_path.exists() {
        if let Ok(content) = fs::read_to_string(&patterns_path) {
            let declared = content.matches("[[rules]]").count();
            let loaded = table.rules.len() - builtin;
            if declared > loaded {
                println!("warning:  {} pattern rule(s) skipped as invalid", declared - loaded);
            }
        }
    }

    Ok(0)
}
