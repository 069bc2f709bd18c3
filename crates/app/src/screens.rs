//! Line-based terminal screens: sign-in, sign-up, password reset, game, results.

use std::io::Write;

use services::{
    AppServices, GameOutcome, GameStart, GameUpdate, PlayerInput, QuestionView, TICK, play,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use trivia_core::QuizSummary;
use trivia_core::model::Registration;

type Input = Lines<BufReader<Stdin>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    SignIn,
    Register,
    ForgotPassword,
    Game,
    Results(QuizSummary),
    Exit,
}

pub async fn run(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut screen = if services.auth().current_user().await.is_some() {
        Screen::Game
    } else {
        Screen::SignIn
    };

    loop {
        screen = match screen {
            Screen::SignIn => sign_in(services, &mut input).await?,
            Screen::Register => register(services, &mut input).await?,
            Screen::ForgotPassword => forgot_password(services, &mut input).await?,
            Screen::Game => game(services, &mut input).await?,
            Screen::Results(summary) => results(services, &mut input, summary).await?,
            Screen::Exit => return Ok(()),
        };
    }
}

async fn prompt(input: &mut Input, label: &str) -> std::io::Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    Ok(input.next_line().await?.map(|line| line.trim_end().to_string()))
}

async fn sign_in(services: &AppServices, input: &mut Input) -> std::io::Result<Screen> {
    println!();
    println!("== Trivia ==");
    println!("[1] Sign in  [2] Create account  [3] Forgot password  [q] Quit");
    let Some(choice) = prompt(input, "> ").await? else {
        return Ok(Screen::Exit);
    };

    match choice.as_str() {
        "1" => {
            let Some(email) = prompt(input, "Email: ").await? else {
                return Ok(Screen::Exit);
            };
            let Some(password) = prompt(input, "Password: ").await? else {
                return Ok(Screen::Exit);
            };
            match services.auth().login(&email, &password).await {
                Ok(_) => Ok(Screen::Game),
                Err(err) => {
                    println!("! {err}");
                    Ok(Screen::SignIn)
                }
            }
        }
        "2" => Ok(Screen::Register),
        "3" => Ok(Screen::ForgotPassword),
        "q" => Ok(Screen::Exit),
        _ => Ok(Screen::SignIn),
    }
}

async fn register(services: &AppServices, input: &mut Input) -> std::io::Result<Screen> {
    println!();
    println!("== Create account ==");
    let mut fields = Vec::with_capacity(4);
    for label in ["Username: ", "Email: ", "Password: ", "Confirm password: "] {
        let Some(value) = prompt(input, label).await? else {
            return Ok(Screen::Exit);
        };
        fields.push(value);
    }
    let mut fields = fields.into_iter();
    let registration = Registration {
        username: fields.next().unwrap_or_default(),
        email: fields.next().unwrap_or_default(),
        password: fields.next().unwrap_or_default(),
        confirm_password: fields.next().unwrap_or_default(),
    };

    match services.auth().register(registration).await {
        Ok(user) => {
            println!("Account created. Welcome, {}!", user.username);
            Ok(Screen::Game)
        }
        Err(err) => {
            println!("! {err}");
            Ok(Screen::SignIn)
        }
    }
}

async fn forgot_password(services: &AppServices, input: &mut Input) -> std::io::Result<Screen> {
    println!();
    println!("== Reset password ==");
    let Some(email) = prompt(input, "Email: ").await? else {
        return Ok(Screen::Exit);
    };
    match services.auth().request_password_reset(&email).await {
        Ok(()) => println!("Instructions sent to {email}"),
        Err(err) => println!("! {err}"),
    }
    Ok(Screen::SignIn)
}

fn show_question(view: &QuestionView, username: &str) {
    println!();
    println!(
        "{username} | score {} | question {}/{} | {}s",
        view.score,
        view.index + 1,
        view.total,
        view.time_remaining
    );
    if let Some(category) = &view.category {
        println!("[{category}]");
    }
    println!("{}", view.prompt);
    for (i, answer) in view.answers.iter().enumerate() {
        println!("  [{}] {answer}", i + 1);
    }
    println!("Pick a number, or [q] to sign out.");
}

async fn game(services: &AppServices, input: &mut Input) -> Result<Screen, Box<dyn std::error::Error>> {
    let auth = services.auth();
    let Some(user) = auth.current_user().await else {
        return Ok(Screen::SignIn);
    };

    println!("Loading questions...");
    let session = match services.games().start_game().await {
        Ok(GameStart::Active(session)) => session,
        Ok(GameStart::Finished(summary)) => return Ok(Screen::Results(summary)),
        Err(err) => {
            println!("! {err}");
            println!("[r] Retry  [q] Sign out");
            return match prompt(input, "> ").await?.as_deref() {
                Some("r") => Ok(Screen::Game),
                Some(_) => {
                    auth.logout().await?;
                    Ok(Screen::SignIn)
                }
                None => Ok(Screen::Exit),
            };
        }
    };

    let (input_tx, input_rx) = mpsc::channel(8);
    let (update_tx, mut update_rx) = mpsc::channel(32);
    let game = tokio::spawn(play(session, input_rx, update_tx, TICK));
    let mut current: Option<QuestionView> = None;

    loop {
        tokio::select! {
            update = update_rx.recv() => match update {
                Some(GameUpdate::Question(view)) => {
                    show_question(&view, &user.username);
                    current = Some(view);
                }
                Some(GameUpdate::Tick { remaining }) => {
                    if remaining <= 5 || remaining % 10 == 0 {
                        println!("  {remaining}s left");
                    }
                }
                Some(GameUpdate::Finished(_) | GameUpdate::Abandoned { .. }) | None => break,
            },
            line = input.next_line() => {
                let Some(line) = line? else {
                    let _ = input_tx.send(PlayerInput::Quit).await;
                    break;
                };
                let line = line.trim();
                if line == "q" {
                    let _ = input_tx.send(PlayerInput::Quit).await;
                    continue;
                }
                let picked = line
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| current.as_ref()?.answers.get(i).cloned());
                match picked {
                    Some(answer) => {
                        let _ = input_tx.send(PlayerInput::Answer(answer)).await;
                    }
                    None => println!("Pick a number from the list."),
                }
            }
        }
    }

    drop(input_tx);
    match game.await?? {
        GameOutcome::Finished(summary) => Ok(Screen::Results(summary)),
        GameOutcome::Abandoned { .. } => {
            auth.logout().await?;
            Ok(Screen::SignIn)
        }
    }
}

async fn results(
    services: &AppServices,
    input: &mut Input,
    summary: QuizSummary,
) -> std::io::Result<Screen> {
    let name = services
        .auth()
        .current_user()
        .await
        .map(|user| user.username)
        .unwrap_or_default();
    println!();
    println!("== Well done, {name}! ==");
    println!("{} points ({}/{} correct)", summary.score, summary.correct, summary.total);
    println!("[1] Play again  [q] Sign out");

    match prompt(input, "> ").await?.as_deref() {
        Some("1") => Ok(Screen::Game),
        Some(_) => {
            if let Err(err) = services.auth().logout().await {
                println!("! {err}");
            }
            Ok(Screen::SignIn)
        }
        None => Ok(Screen::Exit),
    }
}
