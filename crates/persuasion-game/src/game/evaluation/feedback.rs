use super::super::domain::TonalStyle;

/// Band headline followed by tone advisories, in that order.
pub(crate) fn feedback_for(score: u8, tone: TonalStyle) -> Vec<String> {
    let mut feedback = Vec::with_capacity(2);

    let headline = match score {
        80.. => "Excellent argument! Your points are well-structured and persuasive.",
        60..=79 => "Good argument with room for improvement.",
        40..=59 => "Your argument needs more structure and evidence.",
        _ => "Try to provide more specific examples and logical connections.",
    };
    feedback.push(headline.to_string());

    match tone {
        TonalStyle::Confrontational => feedback.push(
            "Consider using a more respectful tone to increase persuasiveness.".to_string(),
        ),
        TonalStyle::Casual => {
            feedback.push("A more formal tone might strengthen your argument.".to_string())
        }
        _ => {}
    }

    feedback
}
