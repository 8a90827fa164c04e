diesel::table! {
    currencies (currency_code) {
        currency_code -> Text,
        symbol -> Text,
        decimal_places -> Integer,
        created_at -> Timestamp,
        created_by -> Text,
        updated_at -> Timestamp,
        updated_by -> Nullable<Text>,
        version -> Integer,
        is_deleted -> Bool,
    }
}

diesel::table! {
    regions (region_code) {
        region_code -> Text,
        name -> Text,
        timezone -> Text,
        locale -> Text,
        default_currency_code -> Text,
        created_at -> Timestamp,
        created_by -> Text,
        updated_at -> Timestamp,
        updated_by -> Nullable<Text>,
        version -> Integer,
        is_deleted -> Bool,
    }
}

diesel::table! {
    card_accounts (account_id) {
        account_id -> Text,
        company_id -> Text,
        region_code -> Text,
        currency_code -> Text,
        credit_limit -> Text,
        available_credit -> Text,
        statement_balance -> Text,
        cycle_start_day -> Integer,
        created_at -> Timestamp,
        created_by -> Text,
        updated_at -> Timestamp,
        updated_by -> Nullable<Text>,
        version -> Integer,
        is_deleted -> Bool,
    }
}

diesel::table! {
    cards (card_id) {
        card_id -> Text,
        account_id -> Text,
        pan_token -> Text,
        pan_last4 -> Text,
        expiry_date -> Date,
        status -> Text,
        activated_at -> Nullable<Timestamp>,
        blocked_at -> Nullable<Timestamp>,
        created_at -> Timestamp,
        created_by -> Text,
        updated_at -> Timestamp,
        updated_by -> Nullable<Text>,
        version -> Integer,
        is_deleted -> Bool,
    }
}

diesel::table! {
    statements (statement_id) {
        statement_id -> Text,
        account_id -> Text,
        period_start -> Date,
        period_end -> Date,
        currency_code -> Text,
        total_due_amount -> Text,
        minimum_due_amount -> Text,
        due_date -> Date,
        paid_amount -> Text,
        paid_at -> Nullable<Timestamp>,
        pdf_url -> Nullable<Text>,
        created_at -> Timestamp,
        created_by -> Text,
        updated_at -> Timestamp,
        updated_by -> Nullable<Text>,
        version -> Integer,
        is_deleted -> Bool,
    }
}

diesel::table! {
    transactions (transaction_id) {
        transaction_id -> Text,
        card_id -> Text,
        posted_at -> Timestamp,
        amount -> Text,
        currency_code -> Text,
        exchange_rate -> Text,
        fx_rate_date -> Nullable<Date>,
        merchant_name -> Text,
        category -> Text,
        status -> Text,
        needs_reconciliation -> Bool,
        created_at -> Timestamp,
        created_by -> Text,
        updated_at -> Timestamp,
        updated_by -> Nullable<Text>,
        version -> Integer,
        is_deleted -> Bool,
    }
}

diesel::joinable!(regions -> currencies (default_currency_code));
diesel::joinable!(cards -> card_accounts (account_id));
diesel::joinable!(statements -> card_accounts (account_id));
diesel::joinable!(transactions -> cards (card_id));

diesel::allow_tables_to_appear_in_same_query!(
    currencies,
    regions,
    card_accounts,
    cards,
    statements,
    transactions,
);
