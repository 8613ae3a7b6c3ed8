#![allow(dead_code)]

// All LLM prompt constants and prompt-building for the recommendation flow.
// The formatter is a pure function: identical responses must produce
// byte-identical prompts.

use crate::schema::{Answer, FormResponses};

/// System prompt — career advisor persona, Italian-language replies.
pub const ADVISOR_SYSTEM: &str = "Sei un consulente di carriera che fornisce consigli \
    su qualsiasi tipo di professione. Offri suggerimenti personalizzati basati sugli \
    interessi, abilità e preferenze delle persone. Rispondi sempre in italiano con un \
    linguaggio professionale ma accessibile.";

const PROMPT_HEADER: &str =
    "Una persona ha risposto alle seguenti domande sui suoi interessi e preferenze:\n\n";

/// Fixed instruction block requesting a single JSON object with exactly the
/// recommendation schema's keys.
const OUTPUT_CONTRACT: &str = "\nBasandoti su queste risposte, qual è la carriera più adatta \
per questa persona? Fornisci una spiegazione dettagliata e ponderata in italiano.\n\n\
Restituisci la tua risposta come un oggetto JSON con la seguente struttura:\n\
{\n\
  \"careerTitle\": \"Il titolo della carriera consigliata\",\n\
  \"explanation\": \"Una spiegazione dettagliata del perché questa carriera è un buon abbinamento\",\n\
  \"matchPercentage\": 85, // Un numero tra 1-100 che indica la confidenza\n\
  \"alternativeCareers\": [\n\
    { \"title\": \"Carriera Alternativa 1\", \"description\": \"Breve spiegazione\" },\n\
    { \"title\": \"Carriera Alternativa 2\", \"description\": \"Breve spiegazione\" }\n\
  ],\n\
  \"nextSteps\": [\"Passo 1\", \"Passo 2\", \"Passo 3\"] // Passaggi successivi consigliati\n\
}";

/// Serializes the survey answers into the upstream prompt.
///
/// One bullet per answer, in insertion order: the question key with
/// underscores replaced by spaces and each word capitalized, the answer
/// joined with ", " when it is a list.
pub fn format_prompt(responses: &FormResponses) -> String {
    let mut prompt = String::from(PROMPT_HEADER);

    for (key, answer) in responses.iter() {
        let question = humanize_key(key);
        let value = match answer {
            Answer::Text(text) => text.clone(),
            Answer::Multi(items) => items.join(", "),
        };
        prompt.push_str(&format!("• '{question}' → '{value}'\n"));
    }

    prompt.push_str(OUTPUT_CONTRACT);
    prompt
}

/// `math_problem_solving` → `Math Problem Solving`.
fn humanize_key(key: &str) -> String {
    key.replace('_', " ")
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
