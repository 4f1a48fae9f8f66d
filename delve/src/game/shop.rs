//! Shop mode: buying and selling at a room's merchant

use std::sync::Arc;

use super::{exploration, Game, GameMode, TransitionContext};
use crate::catalog::find_item;
use crate::commands::{Command, Verb};
use crate::world::Shop;

pub(super) fn enter(game: &mut Game) -> String {
    if current_shop(game).is_none() {
        return "There is no shop here.".to_string();
    }
    game.transition_to(GameMode::Shop, TransitionContext::default());
    listing(game)
}

pub(super) fn update(_game: &mut Game) {}

pub(super) fn command(game: &mut Game, cmd: &Command) -> Option<String> {
    let reply = match cmd.verb? {
        Verb::List | Verb::Look | Verb::Shop => listing(game),
        Verb::Buy => buy(game, cmd),
        Verb::Sell => sell(game, cmd),
        Verb::Examine => match cmd.target() {
            Some(target) => exploration::examine(game, &target),
            None => "Examine what?".to_string(),
        },
        Verb::Inventory => game.player.inventory_listing(game.catalog.as_ref()),
        Verb::Back => {
            game.return_to_previous();
            "You leave the shop.".to_string()
        }
        _ => return None,
    };
    Some(reply)
}

fn current_shop(game: &Game) -> Option<Shop> {
    game.room().and_then(|room| room.shop.clone())
}

/// Half the item's value, never less than one coin
pub fn sell_price(value: u32) -> u32 {
    (value / 2).max(1)
}

fn listing(game: &Game) -> String {
    let Some(shop) = current_shop(game) else {
        return "There is no shop here.".to_string();
    };
    let mut lines = vec![format!("{} sells:", shop.name)];
    for (id, price) in &shop.stock {
        lines.push(format!("  {} - {} coins", game.catalog.display_name(id), price));
    }
    lines.push(format!("You have {} coins.", game.player.coins));
    lines.join("\n")
}

fn buy(game: &mut Game, cmd: &Command) -> String {
    let Some(query) = cmd.target() else {
        return "Buy what?".to_string();
    };
    let Some(shop) = current_shop(game) else {
        return "There is no shop here.".to_string();
    };
    let catalog = Arc::clone(&game.catalog);
    let Some((id, price)) = find_item(catalog.as_ref(), &query, shop.stock.keys())
        .and_then(|id| shop.stock.get(&id).map(|price| (id, *price)))
    else {
        return format!("{} doesn't sell any {}.", shop.name, query);
    };

    let name = catalog.display_name(&id);
    if game.player.coins < price {
        return format!(
            "You need {} coins to buy the {}, but you only have {}.",
            price, name, game.player.coins
        );
    }
    game.player.coins -= price;
    game.player.inventory.add(&id, 1);
    format!("You buy the {} for {} coins.", name, price)
}

fn sell(game: &mut Game, cmd: &Command) -> String {
    let Some(query) = cmd.target() else {
        return "Sell what?".to_string();
    };
    if current_shop(game).is_none() {
        return "There is no shop here.".to_string();
    }
    let catalog = Arc::clone(&game.catalog);
    let Some(id) = find_item(catalog.as_ref(), &query, game.player.inventory.ids()) else {
        return format!("You don't have any {}.", query);
    };
    let Some(def) = catalog.resolve(&id) else {
        return format!("Nobody wants your {}.", query);
    };

    let price = sell_price(def.value);
    game.player.inventory.remove(&id, 1);
    game.player.coins += price;
    format!("You sell the {} for {} coins.", def.name, price)
}
