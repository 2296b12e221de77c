diesel::table! {
    budget_accounts (project_id) {
        project_id -> Text,
        annual_allocation -> Text,
        available_balance -> Text,
        quarterly_allocation -> Text,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    budget_history (id) {
        id -> BigInt,
        project_id -> Text,
        previous_amount -> Text,
        new_amount -> Text,
        change_type -> Text,
        change_reason -> Text,
        document_id -> Nullable<Text>,
        created_by -> Nullable<Text>,
        created_at -> Text,
    }
}

diesel::table! {
    budget_year_closures (id) {
        id -> Text,
        project_id -> Text,
        year -> Integer,
        archived_amount -> Text,
        closed_at -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    budget_accounts,
    budget_history,
    budget_year_closures,
);
