//! 寄付する品目の入力と一覧

use give_and_get_common::donations::DONATION_CATEGORIES;
use give_and_get_common::{DonationDraft, DonationItem, DonationList};
use leptos::prelude::*;

#[component]
pub fn DonationPanel(donations: RwSignal<DonationList>) -> impl IntoView {
    let draft = RwSignal::new(DonationDraft::default());

    let edit = move |apply: fn(&mut DonationDraft, String), ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        draft.update(|d| apply(d, value));
    };

    let on_add = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let item = draft.get_untracked();
        donations.update(|list| {
            list.add(item);
        });
        draft.update(|d| {
            *d = DonationDraft {
                category: d.category.clone(),
                ..DonationDraft::default()
            }
        });
    };

    view! {
        <div class="donations">
            <h3>"Items to Donate"</h3>
            <form class="donation-form" on:submit=on_add>
                <select on:change=move |ev| edit(|d, v| d.category = v, ev)>
                    {DONATION_CATEGORIES
                        .into_iter()
                        .map(|category| {
                            view! {
                                <option value=category selected=move || draft.with(|d| d.category == category)>
                                    {category}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <input
                    type="text"
                    placeholder="Item name"
                    prop:value=move || draft.with(|d| d.item_name.clone())
                    on:input=move |ev| edit(|d, v| d.item_name = v, ev)
                />
                <input
                    type="number"
                    min="1"
                    prop:value=move || draft.with(|d| d.quantity.clone())
                    on:input=move |ev| edit(|d, v| d.quantity = v, ev)
                />
                <input
                    type="text"
                    placeholder="Description (optional)"
                    prop:value=move || draft.with(|d| d.description.clone())
                    on:input=move |ev| edit(|d, v| d.description = v, ev)
                />
                <button type="submit" class="btn btn-secondary btn-small">"Add Item"</button>
            </form>

            <Show
                when=move || donations.with(|list| !list.is_empty())
                fallback=|| view! { <p class="text-muted">"No items added. Matching will use all nearby organizations."</p> }
            >
                <ul class="donation-items">
                    <For
                        each=move || donations.with(|list| list.items().to_vec())
                        key=|item| item.id
                        let:item
                    >
                        <DonationRow donations=donations item=item />
                    </For>
                </ul>
            </Show>
        </div>
    }
}

#[component]
fn DonationRow(donations: RwSignal<DonationList>, item: DonationItem) -> impl IntoView {
    let DonationItem { id, item_name, quantity, category, description } = item;
    let note = (!description.is_empty()).then(|| view! { <p class="text-muted">{description}</p> });

    view! {
        <li>
            <span class="item-name">{item_name}</span>
            <span class="item-quantity">{format!(" x{}", quantity)}</span>
            <span class="item-category">{format!(" ({})", category)}</span>
            {note}
            <button
                class="btn btn-tertiary btn-small"
                on:click=move |_| {
                    donations.update(|list| {
                        list.remove(id);
                    })
                }
            >
                "Remove"
            </button>
        </li>
    }
}
