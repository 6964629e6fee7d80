/// Build a deterministic prompt for one completion call.
///
/// The instructions and the carried-forward context are woven in only when
/// present: the first segment (and runs with context disabled) get a plain
/// summarization request, and the final aggregation call passes empty
/// instructions to get the bare "Summarize the following text" form.
pub fn build_segment_prompt(instructions: &str, context: &str, text: &str) -> String {
    let instructions = instructions.trim();
    let context = context.trim();

    let request = if context.is_empty() {
        format!("Summarize the following text:\n\n{text}")
    } else {
        format!("Given the context: {context}. Continue a summary of the following text:\n\n{text}")
    };

    if instructions.is_empty() {
        request
    } else {
        format!("{instructions}\n\n{request}")
    }
}
