use super::domain::DimensionSet;
use serde::Serialize;

/// Labels shown under the five response buttons, from 1 to 5.
pub const LIKERT_ANCHORS: [&str; 5] = [
    "Very Inaccurate",
    "Moderately Inaccurate",
    "Neither",
    "Moderately Accurate",
    "Very Accurate",
];

const BIG_FIVE_ITEMS: [&str; 50] = [
    "Am the life of the party.",
    "Feel little concern for others.",
    "Am always prepared.",
    "Get stressed out easily.",
    "Have a rich vocabulary.",
    "Don't talk a lot.",
    "Am interested in people.",
    "Leave my belongings around.",
    "Am relaxed most of the time.",
    "Have difficulty understanding abstract ideas.",
    "Feel comfortable around people.",
    "Insult people.",
    "Pay attention to details.",
    "Worry about things.",
    "Have a vivid imagination.",
    "Keep in the background.",
    "Sympathize with others' feelings.",
    "Make a mess of things.",
    "Seldom feel blue.",
    "Am not interested in abstract ideas.",
    "Start conversations.",
    "Am not interested in other people's problems.",
    "Get chores done right away.",
    "Am easily disturbed.",
    "Have excellent ideas.",
    "Have little to say.",
    "Have a soft heart.",
    "Often forget to put things back in their proper place.",
    "Get upset easily.",
    "Do not have a good imagination.",
    "Talk to a lot of different people at parties.",
    "Am not really interested in others.",
    "Like order.",
    "Change my mood a lot.",
    "Am quick to understand things.",
    "Don't like to draw attention to myself.",
    "Take time out for others.",
    "Shirk my duties.",
    "Have frequent mood swings.",
    "Use difficult words.",
    "Don't mind being the center of attention.",
    "Feel others' emotions.",
    "Follow a schedule.",
    "Get irritated easily.",
    "Spend time reflecting on things.",
    "Am quiet around strangers.",
    "Make people feel at ease.",
    "Am exacting in my work.",
    "Often feel blue.",
    "Am full of ideas.",
];

const BASIC_NEEDS_ITEMS: [&str; 35] = [
    "To what extent do concerns such as savings, living expenses, housing, and career future occupy your mind?",
    "How much do you think about your physical health, hygiene, and the possibility of getting sick?",
    "How would you rate the intensity of your sexual desire?",
    "How cautious are you when it comes to risky activities?",
    "To what extent do you avoid new experiences or starting unfamiliar paths?",
    "According to your friends and colleagues, how punctual, orderly, and accurate are you?",
    "How important is job security and having a stable income to you?",
    "How much love, intimacy, and affection do you feel you need?",
    "How important is the well-being and happiness of other people to you?",
    "How much do you need to feel accepted and loved by others?",
    "How much do you need others to treat you with kindness and affection, and for you to feel that you belong with them?",
    "How much do you enjoy interacting with others and actively participating in gatherings, events, and group activities?",
    "According to your friends and colleagues, how warm, friendly, compassionate, and kind are you?",
    "How important is it to you to maintain good relationships with loved ones and people around you, and how much effort do you put into it?",
    "How important is it for you to make your own choices in what you do?",
    "To what extent do you believe no one should tell you how to run your life?",
    "To what extent are you willing to do what you want, regardless of pressure or interference from your partner?",
    "How strongly do you insist on having a say in both big and small life decisions?",
    "How much do you need personal time that you can use however you want?",
    "How willing are you to travel to new places?",
    "To what extent do you seek change and new experiences, and dislike static or repetitive environments?",
    "How much do you try to show yourself as a capable and competent person in your field?",
    "How much do you enjoy giving orders to others, rather than receiving them?",
    "How ambitious and competitive do you consider yourself to be?",
    "How much would you like others (children, spouse, or friends) to listen to you and follow your guidance?",
    "To what extent do you try to prove your ideas are right and persuade others to accept them?",
    "How concerned are you with personal growth and development, and how much do you seek to develop your abilities?",
    "How much time do you spend learning new things in different fields?",
    "How much do you enjoy joking around?",
    "How important is free time and entertainment to you?",
    "How would you rate your sense of humor?",
    "To what extent do you feel the need to engage in informal, enjoyable activities such as cycling, fishing, or watching movies?",
    "How much do you look for fun times and joyful situations such as celebrations, parties, and games?",
    "How important is laughter in your life?",
    "In your opinion, how important are fun, play, and enjoyment in life?",
];

/// One of the two fixed questionnaires.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Inventory {
    pub set: DimensionSet,
    pub title: &'static str,
    pub instructions: &'static str,
    #[serde(skip)]
    items: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryItem {
    pub number: usize,
    pub text: &'static str,
}

impl Inventory {
    pub const fn big_five() -> Self {
        Self {
            set: DimensionSet::Traits,
            title: "Big Five Personality Test",
            instructions: "Describe yourself as you generally are now. For each statement, choose from 1 (Very Inaccurate) to 5 (Very Accurate).",
            items: &BIG_FIVE_ITEMS,
        }
    }

    pub const fn basic_needs() -> Self {
        Self {
            set: DimensionSet::Needs,
            title: "Basic Needs Test",
            instructions: "For each question, choose from 1 (very little) to 5 (very much).",
            items: &BASIC_NEEDS_ITEMS,
        }
    }

    pub const fn for_set(set: DimensionSet) -> Self {
        match set {
            DimensionSet::Traits => Self::big_five(),
            DimensionSet::Needs => Self::basic_needs(),
        }
    }

    pub const fn len(&self) -> usize {
        self.items.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> Vec<InventoryItem> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, text)| InventoryItem {
                number: index + 1,
                text,
            })
            .collect()
    }

    pub fn item(&self, number: usize) -> Option<&'static str> {
        number
            .checked_sub(1)
            .and_then(|index| self.items.get(index))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventories_match_expected_answer_lengths() {
        for set in [DimensionSet::Traits, DimensionSet::Needs] {
            assert_eq!(Inventory::for_set(set).len(), set.expected_answers());
        }
    }

    #[test]
    fn items_are_numbered_from_one() {
        let inventory = Inventory::big_five();
        let items = inventory.items();
        assert_eq!(items[0].number, 1);
        assert_eq!(items[0].text, "Am the life of the party.");
        assert_eq!(inventory.item(50), Some("Am full of ideas."));
        assert_eq!(inventory.item(0), None);
        assert_eq!(inventory.item(51), None);
    }
}
