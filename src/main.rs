//! Demo driver for the close-factor RSA attack.
//!
//! Usage:
//!   fermat-attack <e> <n> <ciphertext> [options]
//!
//! Options:
//!   --max-steps=<N>   Cap on factor-search increments (default 1000000)
//!   --rounds=<N>      Miller-Rabin rounds (default 1000)
//!   --seed=<N>        Seed the witness RNG for a reproducible run
//!   --json            Emit a machine-readable report on stdout
//!
//! All three positional arguments are positive decimal integers of any
//! size. Exit status: 0 on recovery, 1 when the attack fails, 2 on bad
//! arguments.

use std::process;
use std::time::Instant;

use num_bigint::BigUint;
use num_traits::Zero;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use fermat_attack::{attack, AttackError, AttackParams};

struct CliConfig {
    e: BigUint,
    n: BigUint,
    ciphertext: BigUint,
    max_steps: u64,
    rounds: u32,
    seed: Option<u64>,
    json: bool,
}

#[derive(Serialize)]
struct AttackReport {
    e: String,
    n: String,
    ciphertext: String,
    success: bool,
    outcome: String,
    p: Option<String>,
    q: Option<String>,
    phi: Option<String>,
    d: Option<String>,
    plaintext: Option<String>,
    time_ms: f64,
}

fn usage() -> ! {
    eprintln!("usage: fermat-attack <e> <n> <ciphertext> [--max-steps=N] [--rounds=N] [--seed=N] [--json]");
    process::exit(2);
}

fn parse_positive(value: &str, name: &str) -> BigUint {
    match value.parse::<BigUint>() {
        Ok(v) if !v.is_zero() => v,
        _ => {
            eprintln!("invalid {}: '{}' (expected a positive integer)", name, value);
            process::exit(2);
        }
    }
}

fn parse_args() -> CliConfig {
    let mut positional: Vec<String> = Vec::new();
    let mut max_steps = fermat_attack::DEFAULT_MAX_STEPS;
    let mut rounds = fermat_attack::DEFAULT_ROUNDS;
    let mut seed = None;
    let mut json = false;

    for arg in std::env::args().skip(1) {
        if let Some(value) = arg.strip_prefix("--max-steps=") {
            max_steps = value.parse().unwrap_or_else(|_| usage());
        } else if let Some(value) = arg.strip_prefix("--rounds=") {
            rounds = value.parse().unwrap_or_else(|_| usage());
        } else if let Some(value) = arg.strip_prefix("--seed=") {
            seed = Some(value.parse().unwrap_or_else(|_| usage()));
        } else if arg == "--json" {
            json = true;
        } else if arg.starts_with("--") {
            eprintln!("unknown option: {}", arg);
            usage();
        } else {
            positional.push(arg);
        }
    }

    if positional.len() != 3 {
        usage();
    }

    CliConfig {
        e: parse_positive(&positional[0], "public exponent e"),
        n: parse_positive(&positional[1], "modulus n"),
        ciphertext: parse_positive(&positional[2], "ciphertext"),
        max_steps,
        rounds,
        seed,
        json,
    }
}

fn main() {
    env_logger::init();
    let config = parse_args();

    let params = AttackParams {
        miller_rabin_rounds: config.rounds,
        max_search_steps: config.max_steps,
    };
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let start = Instant::now();
    let result = attack(&config.e, &config.n, &config.ciphertext, &params, &mut rng);
    let time_ms = start.elapsed().as_secs_f64() * 1000.0;

    let report = match &result {
        Ok(r) => AttackReport {
            e: config.e.to_string(),
            n: config.n.to_string(),
            ciphertext: config.ciphertext.to_string(),
            success: true,
            outcome: "recovered".into(),
            p: Some(r.p.to_string()),
            q: Some(r.q.to_string()),
            phi: Some(r.phi.to_string()),
            d: Some(r.d.to_string()),
            plaintext: Some(r.plaintext.to_string()),
            time_ms,
        },
        Err(err) => AttackReport {
            e: config.e.to_string(),
            n: config.n.to_string(),
            ciphertext: config.ciphertext.to_string(),
            success: false,
            outcome: err.to_string(),
            p: None,
            q: None,
            phi: None,
            d: None,
            plaintext: None,
            time_ms,
        },
    };

    if config.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("failed to serialize report: {}", err);
                process::exit(1);
            }
        }
    }

    match result {
        Ok(r) => {
            if !config.json {
                println!("Prime factors of n:  {} * {}", r.p, r.q);
                println!("Phi:                 {}", r.phi);
                println!("Private key d:       {}", r.d);
                println!("{}", "-".repeat(50));
                println!("Decrypted message:   {}", r.plaintext);
                println!("({:.2} ms)", time_ms);
            }
        }
        Err(err) => {
            match err {
                AttackError::PrimeModulus | AttackError::CompositeFactors => {
                    eprintln!("Key is not vulnerable to the factoring attack: {}", err);
                }
                _ => {
                    eprintln!("Attack did not complete: {}", err);
                }
            }
            process::exit(1);
        }
    }
}
