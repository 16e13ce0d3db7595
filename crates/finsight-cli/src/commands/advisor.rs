//! Advisor command implementations

use std::path::Path;

use anyhow::Result;
use finsight_core::{
    describe_answer, AIBackend, Advisor, Config, Error, Ledger, MonthKeywordTable,
    QueryInterpreter,
};

use super::{build_advisor, load_ledger};

const NO_ADVISOR: &str = "no advisor backend configured (set [advisor] host or OLLAMA_HOST)";

/// Answer a question from the ledger, falling back to the advisor
pub async fn cmd_ask(file: &Path, config: &Config, question: &str) -> Result<()> {
    let ledger = load_ledger(file)?;
    let advisor = build_advisor(config);
    println!("{}", answer_question(&ledger, config, advisor.as_ref(), question).await?);
    Ok(())
}

/// Text shown for a question
///
/// Advisor failures and empty questions become user-facing lines rather
/// than errors, so the caller can keep going.
pub async fn answer_question(
    ledger: &Ledger,
    config: &Config,
    advisor: Option<&Advisor>,
    question: &str,
) -> Result<String> {
    let interpreter = QueryInterpreter::new(
        config.synonym_table(),
        MonthKeywordTable::for_ledger(ledger),
    );

    let result = match advisor {
        Some(advisor) => interpreter.answer(ledger, question, advisor).await,
        None if question.trim().is_empty() => Err(Error::EmptyQuestion),
        None => interpreter
            .answer_from_ledger(ledger, question)
            .ok_or_else(|| Error::Advisor(NO_ADVISOR.to_string())),
    };

    match result {
        Ok(answer) => Ok(describe_answer(&answer, &config.currency)),
        Err(e) => user_facing(e),
    }
}

/// AI advice for the whole ledger
pub async fn cmd_insights(file: &Path, config: &Config) -> Result<()> {
    let ledger = load_ledger(file)?;
    let text = match build_advisor(config) {
        Some(advisor) => match advisor.insights(&ledger).await {
            Ok(text) => text,
            Err(e) => user_facing(e)?,
        },
        None => user_facing(Error::Advisor(NO_ADVISOR.to_string()))?,
    };

    println!();
    println!("🤖 Financial Insights");
    println!("{}", text);
    Ok(())
}

fn user_facing(e: Error) -> Result<String> {
    match e {
        Error::Advisor(msg) => Ok(format!("LLM Error: {}", msg)),
        Error::EmptyQuestion => Ok("Please enter a question.".to_string()),
        other => Err(other.into()),
    }
}

/// Check the configured backend and run a short completion
pub async fn cmd_advisor_test(config: &Config, model: Option<&str>) -> Result<()> {
    println!("🔍 Testing advisor backend...\n");

    let Some(advisor) = build_advisor(config) else {
        println!("  ⚠️  {}", NO_ADVISOR);
        println!("\nTo set up Ollama:");
        println!("  1. Install Ollama: https://ollama.ai/download");
        println!("  2. Start the server: ollama serve");
        println!("  3. Set environment variable: export OLLAMA_HOST=http://localhost:11434");
        return Ok(());
    };

    let client = match model {
        Some(m) => advisor.client().with_model(m),
        None => advisor.client().clone(),
    };

    println!("  Backend: {}", client.backend_name());
    println!("  Host:    {}", client.host());
    println!("  Model:   {}\n", client.model());

    print!("Checking availability... ");
    if !client.health_check().await {
        println!("❌ Failed");
        println!("\n⚠️  Could not reach {}", client.host());
        println!("  Is the server running, and is the model pulled?");
        return Ok(());
    }
    println!("✅ Connected");

    println!("\n💬 Test completion...\n");
    let advisor = Advisor::new(client)
        .with_max_tokens(advisor.max_tokens())
        .with_currency(&config.currency);
    match advisor.ask("Give one short tip for tracking monthly expenses.").await {
        Ok(text) => println!("{}", text),
        Err(e) => println!("❌ Error: {}", e),
    }

    Ok(())
}
