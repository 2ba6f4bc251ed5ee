use std::collections::{BTreeMap, HashSet};
use tichu_core::model::card::Card;
use tichu_core::model::combo::Combo;
use tichu_core::model::hand::Hand;
use tichu_core::model::rank::Rank;
use tichu_core::model::suit::Suit;

/// Every candidate play a hand can open a trick with, in a deterministic
/// order: singles first, then the multi-card shapes, bombs last, each group
/// ascending by rank.
pub fn leads(hand: &Hand) -> Vec<Combo> {
    enumerate(hand)
}

/// The candidates that would beat `leader`, bombs included.
pub fn responses(hand: &Hand, leader: &Combo) -> Vec<Combo> {
    enumerate(hand)
        .into_iter()
        .filter(|combo| matches!(combo.beats(leader), Ok(true)))
        .collect()
}

/// The four-of-a-kind and one-suit-run bombs hiding in a hand.
pub fn bombs(hand: &Hand) -> Vec<Combo> {
    let mut found = Vec::new();
    push_quads(hand, &mut found);
    push_bomb_runs(hand, &mut found);
    found
}

fn enumerate(hand: &Hand) -> Vec<Combo> {
    let groups = rank_groups(hand);
    let mut combos = Vec::new();
    push_singles(&groups, &mut combos);
    push_sets(&groups, &mut combos);
    push_pair_ladders(&groups, &mut combos);
    push_full_houses(&groups, &mut combos);
    push_straights(&groups, &mut combos);
    combos.extend(bombs(hand));

    // a one-suited run surfaces from both the straight scan and the bomb
    // scan; keep the first sighting of any card set
    let mut seen: HashSet<Vec<Card>> = HashSet::new();
    combos.retain(|combo| seen.insert(combo.cards().to_vec()));
    combos
}

fn rank_groups(hand: &Hand) -> BTreeMap<Rank, Vec<Card>> {
    let mut groups: BTreeMap<Rank, Vec<Card>> = BTreeMap::new();
    for card in hand.iter() {
        groups.entry(card.rank()).or_default().push(*card);
    }
    groups
}

fn add(combos: &mut Vec<Combo>, cards: Vec<Card>) {
    if let Ok(combo) = Combo::new(cards) {
        combos.push(combo);
    }
}

fn push_singles(groups: &BTreeMap<Rank, Vec<Card>>, combos: &mut Vec<Combo>) {
    for cards in groups.values() {
        add(combos, vec![cards[0]]);
    }
}

fn push_sets(groups: &BTreeMap<Rank, Vec<Card>>, combos: &mut Vec<Combo>) {
    for cards in groups.values() {
        if cards.len() >= 2 {
            add(combos, cards[..2].to_vec());
        }
        if cards.len() >= 3 {
            add(combos, cards[..3].to_vec());
        }
    }
}

fn push_pair_ladders(groups: &BTreeMap<Rank, Vec<Card>>, combos: &mut Vec<Combo>) {
    let paired: Vec<Rank> = groups
        .iter()
        .filter(|(_, cards)| cards.len() >= 2)
        .map(|(&rank, _)| rank)
        .collect();
    for chain in successor_chains(&paired) {
        for width in 2..=chain.len() {
            for window in chain.windows(width) {
                let mut cards = Vec::with_capacity(2 * width);
                for rank in window {
                    cards.extend_from_slice(&groups[rank][..2]);
                }
                add(combos, cards);
            }
        }
    }
}

fn push_full_houses(groups: &BTreeMap<Rank, Vec<Card>>, combos: &mut Vec<Combo>) {
    for (&triple_rank, triple) in groups {
        if triple.len() < 3 {
            continue;
        }
        for (&pair_rank, pair) in groups {
            if pair_rank == triple_rank || pair.len() < 2 {
                continue;
            }
            let mut cards = triple[..3].to_vec();
            cards.extend_from_slice(&pair[..2]);
            add(combos, cards);
        }
    }
}

fn push_straights(groups: &BTreeMap<Rank, Vec<Card>>, combos: &mut Vec<Combo>) {
    // the phoenix never joins a run, and left in place it would split the
    // scan between mahjong and two
    let present: Vec<Rank> = groups
        .keys()
        .copied()
        .filter(|&rank| rank != Rank::Phoenix)
        .collect();
    for chain in successor_chains(&present) {
        for width in 5..=chain.len() {
            for window in chain.windows(width) {
                let cards: Vec<Card> = window.iter().map(|rank| groups[rank][0]).collect();
                add(combos, cards);
            }
        }
    }
}

fn push_quads(hand: &Hand, combos: &mut Vec<Combo>) {
    for cards in rank_groups(hand).values() {
        if cards.len() == 4 {
            add(combos, cards.clone());
        }
    }
}

fn push_bomb_runs(hand: &Hand, combos: &mut Vec<Combo>) {
    for suit in Suit::ALL {
        let suited: BTreeMap<Rank, Card> = hand
            .iter()
            .filter(|card| card.suit() == Some(suit))
            .map(|card| (card.rank(), *card))
            .collect();
        let present: Vec<Rank> = suited.keys().copied().collect();
        for chain in successor_chains(&present) {
            for width in 5..=chain.len() {
                for window in chain.windows(width) {
                    add(combos, window.iter().map(|rank| suited[rank]).collect());
                }
            }
        }
    }
}

/// Splits an ascending rank list into maximal runs of direct successors.
fn successor_chains(ranks: &[Rank]) -> Vec<Vec<Rank>> {
    let mut chains: Vec<Vec<Rank>> = Vec::new();
    for &rank in ranks {
        match chains.last_mut() {
            Some(chain) if chain.last().copied().and_then(Rank::successor) == Some(rank) => {
                chain.push(rank);
            }
            _ => chains.push(vec![rank]),
        }
    }
    chains
}
